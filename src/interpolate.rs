use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// A value substituted into a `{name}` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Str(String),
    Int(i64),
    Float(f64),
}

impl ArgValue {
    /// Parse a raw command-line value: integers and finite floats become
    /// numbers, everything else stays a string.
    pub fn parse(raw: &str) -> Self {
        if let Ok(n) = raw.parse::<i64>() {
            return ArgValue::Int(n);
        }
        if raw.chars().any(|c| c.is_ascii_digit()) {
            if let Ok(f) = raw.parse::<f64>() {
                if f.is_finite() {
                    return ArgValue::Float(f);
                }
            }
        }
        ArgValue::Str(raw.to_string())
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Str(s) => f.write_str(s),
            ArgValue::Int(n) => write!(f, "{n}"),
            ArgValue::Float(x) => write!(f, "{x}"),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Str(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::Str(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        ArgValue::Int(value)
    }
}

impl From<i32> for ArgValue {
    fn from(value: i32) -> Self {
        ArgValue::Int(i64::from(value))
    }
}

impl From<u32> for ArgValue {
    fn from(value: u32) -> Self {
        ArgValue::Int(i64::from(value))
    }
}

impl From<usize> for ArgValue {
    fn from(value: usize) -> Self {
        i64::try_from(value)
            .map(ArgValue::Int)
            .unwrap_or_else(|_| ArgValue::Str(value.to_string()))
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        ArgValue::Float(value)
    }
}

/// Interpolation arguments keyed by placeholder name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args(HashMap<String, ArgValue>);

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ArgValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.0.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<ArgValue>> FromIterator<(K, V)> for Args {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = Args::new();
        for (name, value) in iter {
            args.insert(name, value);
        }
        args
    }
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
    })
}

/// Replace every `{name}` in `template` with its argument.
///
/// Single pass: substituted text is never scanned again. Placeholders
/// without an argument are kept as written.
pub fn interpolate(template: &str, args: &Args) -> String {
    if args.is_empty() || !template.contains('{') {
        return template.to_string();
    }
    placeholder_regex()
        .replace_all(template, |caps: &Captures| match args.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Placeholder names used by `template`, in order of appearance.
pub fn placeholders(template: &str) -> Vec<&str> {
    placeholder_regex()
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_substitution() {
        let args = Args::new().with("name", "Alice");
        assert_eq!(interpolate("欢迎回来，{name}", &args), "欢迎回来，Alice");
    }

    #[test]
    fn test_numeric_values() {
        let args = Args::new().with("total", 42).with("ratio", 0.5);
        assert_eq!(interpolate("共 {total} 条数据", &args), "共 42 条数据");
        assert_eq!(interpolate("{ratio}", &args), "0.5");
    }

    #[test]
    fn test_unresolved_placeholder_kept() {
        assert_eq!(interpolate("共 {total} 条数据", &Args::new()), "共 {total} 条数据");
        let args = Args::new().with("size", 10);
        assert_eq!(
            interpolate("共 {total} 条, 每页 {size} 条", &args),
            "共 {total} 条, 每页 10 条"
        );
    }

    #[test]
    fn test_non_identifier_braces_untouched() {
        let args = Args::new().with("0", "zero").with("a b", "x");
        assert_eq!(interpolate("{0} {a b} {} {{x}}", &args), "{0} {a b} {} {{x}}");
    }

    #[test]
    fn test_single_pass() {
        let args = Args::new().with("a", "{b}").with("b", "nope");
        assert_eq!(interpolate("{a}", &args), "{b}");
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders("共 {total} 条, 每页 {size} 条"), vec!["total", "size"]);
        assert!(placeholders("提交").is_empty());
    }

    #[test]
    fn test_arg_value_parse() {
        assert_eq!(ArgValue::parse("12"), ArgValue::Int(12));
        assert_eq!(ArgValue::parse("-3"), ArgValue::Int(-3));
        assert_eq!(ArgValue::parse("1.5"), ArgValue::Float(1.5));
        assert_eq!(ArgValue::parse("Alice"), ArgValue::Str("Alice".to_string()));
        assert_eq!(ArgValue::parse("inf"), ArgValue::Str("inf".to_string()));
    }

    #[test]
    fn test_args_from_iter() {
        let args: Args = [("name", "Bob")].into_iter().collect();
        assert_eq!(args.get("name"), Some(&ArgValue::Str("Bob".to_string())));
    }
}
