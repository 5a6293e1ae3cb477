use thiserror::Error;

/// Errors reported by catalog registration and locale switching.
///
/// Missing keys are not errors: `resolve` falls back instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum I18nError {
    /// The locale has no registered catalog.
    #[error("unknown locale: {0}")]
    UnknownLocale(String),

    /// A catalog node is neither a string nor a nested mapping.
    #[error("malformed catalog '{locale}': {found} at '{path}' (expected string or mapping)")]
    MalformedCatalog {
        locale: String,
        /// Dotted path of the offending node; empty for the root.
        path: String,
        /// JSON type name of what was found instead.
        found: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, I18nError>;
