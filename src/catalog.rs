use serde_json::Value;
use std::collections::HashMap;

use crate::error::{I18nError, Result};

/// A node in a message tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Template string, possibly containing `{name}` placeholders.
    Leaf(String),
    /// Nested namespace.
    Namespace(HashMap<String, Node>),
}

impl Node {
    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            Node::Leaf(template) => Some(template),
            Node::Namespace(_) => None,
        }
    }

    fn from_value(locale: &str, path: &mut Vec<String>, value: Value) -> Result<Self> {
        match value {
            Value::String(template) => Ok(Node::Leaf(template)),
            Value::Object(entries) => {
                let mut children = HashMap::with_capacity(entries.len());
                for (key, child) in entries {
                    path.push(key.clone());
                    let node = Self::from_value(locale, path, child)?;
                    path.pop();
                    children.insert(key, node);
                }
                Ok(Node::Namespace(children))
            }
            other => Err(malformed(locale, path, &other)),
        }
    }
}

/// One locale's message tree. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    root: HashMap<String, Node>,
}

impl Catalog {
    /// Build a catalog from a nested mapping.
    ///
    /// The root must be an object and every node below it a string or an
    /// object. The error names the dotted path of the first bad node.
    pub fn from_value(locale: &str, value: Value) -> Result<Self> {
        let mut path = Vec::new();
        match Node::from_value(locale, &mut path, value)? {
            Node::Namespace(root) => Ok(Self { root }),
            Node::Leaf(_) => Err(I18nError::MalformedCatalog {
                locale: locale.to_string(),
                path: String::new(),
                found: "string",
            }),
        }
    }

    /// Walk `key_path` segment by segment and return the leaf template.
    ///
    /// Returns `None` when a segment is missing, when a leaf is reached
    /// before the last segment, or when the path ends on a namespace.
    pub fn lookup(&self, key_path: &str) -> Option<&str> {
        let mut segments = key_path.split('.');
        let first = segments.next()?;
        let mut node = self.root.get(first)?;
        for segment in segments {
            node = match node {
                Node::Namespace(children) => children.get(segment)?,
                Node::Leaf(_) => return None,
            };
        }
        node.as_leaf()
    }

    /// All leaf key paths, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        collect_keys(&self.root, &mut String::new(), &mut keys);
        keys.sort_unstable();
        keys
    }

    /// Number of leaf templates.
    pub fn len(&self) -> usize {
        fn count(children: &HashMap<String, Node>) -> usize {
            children
                .values()
                .map(|node| match node {
                    Node::Leaf(_) => 1,
                    Node::Namespace(nested) => count(nested),
                })
                .sum()
        }
        count(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn collect_keys(children: &HashMap<String, Node>, prefix: &mut String, out: &mut Vec<String>) {
    for (key, node) in children {
        let restore = prefix.len();
        if !prefix.is_empty() {
            prefix.push('.');
        }
        prefix.push_str(key);
        match node {
            Node::Leaf(_) => out.push(prefix.clone()),
            Node::Namespace(nested) => collect_keys(nested, prefix, out),
        }
        prefix.truncate(restore);
    }
}

fn malformed(locale: &str, path: &[String], value: &Value) -> I18nError {
    let found = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::Array(_) => "array",
        Value::String(_) => "string",
        Value::Object(_) => "object",
    };
    I18nError::MalformedCatalog {
        locale: locale.to_string(),
        path: path.join("."),
        found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Catalog {
        Catalog::from_value(
            "zh",
            json!({
                "common": {
                    "submit": "提交",
                    "pagination": { "total": "共 {total} 条数据" },
                    "form": { "required": "此项为必填项" }
                },
                "home": { "welcome": "欢迎回来，{name}" }
            }),
        )
        .unwrap()
    }

    #[test]
    fn test_lookup_nested_leaf() {
        let catalog = sample();
        assert_eq!(catalog.lookup("common.form.required"), Some("此项为必填项"));
        assert_eq!(catalog.lookup("common.submit"), Some("提交"));
        assert_eq!(catalog.lookup("home.welcome"), Some("欢迎回来，{name}"));
    }

    #[test]
    fn test_lookup_failures() {
        let catalog = sample();
        // Missing segment
        assert_eq!(catalog.lookup("common.form.missing"), None);
        // Leaf reached before the path is consumed
        assert_eq!(catalog.lookup("common.submit.extra"), None);
        // Path ends on a namespace
        assert_eq!(catalog.lookup("common.form"), None);
        // Malformed paths
        assert_eq!(catalog.lookup(""), None);
        assert_eq!(catalog.lookup("common..submit"), None);
        assert_eq!(catalog.lookup(".common.submit"), None);
    }

    #[test]
    fn test_keys_and_len() {
        let catalog = sample();
        assert_eq!(
            catalog.keys(),
            vec![
                "common.form.required",
                "common.pagination.total",
                "common.submit",
                "home.welcome",
            ]
        );
        assert_eq!(catalog.len(), 4);
        assert!(!catalog.is_empty());
        assert!(Catalog::default().is_empty());
    }

    #[test]
    fn test_rejects_invalid_nodes() {
        let err = Catalog::from_value("en", json!({ "a": 1 })).unwrap_err();
        assert_eq!(
            err,
            I18nError::MalformedCatalog {
                locale: "en".to_string(),
                path: "a".to_string(),
                found: "number",
            }
        );

        let err = Catalog::from_value("en", json!({ "common": { "form": { "x": null } } }))
            .unwrap_err();
        match err {
            I18nError::MalformedCatalog { path, found, .. } => {
                assert_eq!(path, "common.form.x");
                assert_eq!(found, "null");
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(Catalog::from_value("en", json!({ "list": ["a", "b"] })).is_err());
        assert!(Catalog::from_value("en", json!({ "flag": true })).is_err());
        assert!(Catalog::from_value("en", json!("not a tree")).is_err());
        assert!(Catalog::from_value("en", json!([])).is_err());
    }

    #[test]
    fn test_empty_namespace_is_valid() {
        let catalog = Catalog::from_value("en", json!({ "order": {} })).unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.lookup("order"), None);
    }
}
