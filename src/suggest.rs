use fuzzy_matcher::FuzzyMatcher;

/// A candidate key with its match score
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub score: i64,
    pub indices: Vec<usize>,
}

/// Ranks known key paths against a key that failed to resolve
pub struct KeyMatcher {
    matcher: fuzzy_matcher::skim::SkimMatcherV2,
}

impl KeyMatcher {
    pub fn new() -> Self {
        Self {
            matcher: fuzzy_matcher::skim::SkimMatcherV2::default(),
        }
    }

    /// Skim-style subsequence match
    pub fn fuzzy_match(&self, pattern: &str, key: &str) -> Option<MatchResult> {
        self.matcher
            .fuzzy_indices(key, pattern)
            .map(|(score, indices)| MatchResult { score, indices })
    }

    /// Pattern appears verbatim inside the key
    pub fn exact_match(&self, pattern: &str, key: &str) -> Option<MatchResult> {
        let start = key.find(pattern)?;
        let indices: Vec<usize> = (start..start + pattern.len()).collect();
        let score = 1000 + (pattern.len() * 10) as i64;
        Some(MatchResult { score, indices })
    }

    /// Key shares the pattern's namespace (everything before its last segment)
    pub fn namespace_match(&self, pattern: &str, key: &str) -> Option<MatchResult> {
        let (namespace, _) = pattern.rsplit_once('.')?;
        let prefix_len = namespace.len() + 1;
        if key.len() > prefix_len && key.starts_with(namespace) && key.as_bytes()[namespace.len()] == b'.' {
            let indices: Vec<usize> = (0..namespace.len()).collect();
            let score = 800 + (namespace.len() * 8) as i64;
            Some(MatchResult { score, indices })
        } else {
            None
        }
    }

    /// Try strategies by priority
    pub fn comprehensive_match(&self, pattern: &str, key: &str) -> Option<MatchResult> {
        if pattern.is_empty() {
            return None;
        }

        if let Some(result) = self.exact_match(pattern, key) {
            return Some(result);
        }

        // A fuzzy hit inside the same namespace beats either signal alone
        let namespace = self.namespace_match(pattern, key);
        let fuzzy = self.fuzzy_match(pattern, key);
        match (namespace, fuzzy) {
            (Some(ns), Some(fz)) => Some(MatchResult {
                score: ns.score + fz.score,
                indices: fz.indices,
            }),
            (ns, fz) => ns.or(fz),
        }
    }

    /// Match and sort candidate keys, best first
    pub fn match_and_sort<'a>(&self, pattern: &str, keys: &'a [String]) -> Vec<(&'a str, MatchResult)> {
        let mut results: Vec<(&str, MatchResult)> = keys
            .iter()
            .filter(|key| key.as_str() != pattern)
            .filter_map(|key| {
                self.comprehensive_match(pattern, key)
                    .map(|result| (key.as_str(), result))
            })
            .collect();

        results.sort_by(|a, b| {
            b.1.score
                .cmp(&a.1.score)
                // For same scores, shorter keys first
                .then_with(|| a.0.len().cmp(&b.0.len()))
                .then_with(|| a.0.cmp(b.0))
        });

        results
    }
}

impl Default for KeyMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Up to `limit` known keys resembling `key`.
pub fn suggest(key: &str, keys: &[String], limit: usize) -> Vec<String> {
    KeyMatcher::new()
        .match_and_sort(key, keys)
        .into_iter()
        .take(limit)
        .map(|(key, _)| key.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> Vec<String> {
        [
            "common.form.required",
            "common.form.inputError",
            "common.pagination.total",
            "common.submit",
            "home.welcome",
            "user.title",
            "login.title",
        ]
        .iter()
        .map(|k| k.to_string())
        .collect()
    }

    #[test]
    fn test_key_matcher() {
        let matcher = KeyMatcher::new();

        let pat = "form";
        let result = matcher.exact_match(pat, "common.form.required");
        assert_eq!(result.unwrap().score, 1000 + (pat.len() as i64) * 10);

        let result = matcher.namespace_match("common.form.missing", "common.form.required");
        assert_eq!(result.unwrap().score, 800 + ("common.form".len() as i64) * 8);
        assert!(matcher.namespace_match("common.form.x", "common.formal.x").is_none());
        assert!(matcher.namespace_match("title", "user.title").is_none());

        assert!(matcher.fuzzy_match("cmnsbmt", "common.submit").is_some());
        assert!(matcher.exact_match("xyz", "common.submit").is_none());
        assert!(matcher.comprehensive_match("", "common.submit").is_none());
    }

    #[test]
    fn test_suggest_typo() {
        let suggestions = suggest("common.form.requird", &keys(), 3);
        assert_eq!(suggestions[0], "common.form.required");
        assert!(suggestions.len() <= 3);
    }

    #[test]
    fn test_suggest_same_namespace_first() {
        let suggestions = suggest("common.form.phone", &keys(), 5);
        assert!(suggestions.len() >= 2);
        assert!(suggestions[..2].contains(&"common.form.required".to_string()));
        assert!(suggestions[..2].contains(&"common.form.inputError".to_string()));
    }

    #[test]
    fn test_suggest_substring() {
        let suggestions = suggest("title", &keys(), 5);
        assert_eq!(suggestions, vec!["user.title", "login.title"]);
    }

    #[test]
    fn test_suggest_nothing_similar() {
        assert!(suggest("zzzz", &keys(), 5).is_empty());
        assert!(suggest("common.submit", &["common.submit".to_string()], 5).is_empty());
    }
}
