//! Nested message catalogs with dotted-key lookup.
//!
//! Each locale's catalog is a tree of namespaces and `{name}` templates.
//! [`I18n`] resolves `common.form.required`-style keys against the
//! requested or active locale, falls back to the default locale, and
//! finally echoes the key itself so a missing translation is visible
//! instead of blank.
//!
//! ```
//! use msgcat::{Args, Catalog, I18n};
//! use serde_json::json;
//!
//! let zh = Catalog::from_value("zh", json!({
//!     "home": { "welcome": "欢迎回来，{name}" }
//! })).unwrap();
//! let mut i18n = I18n::new("zh", zh);
//! i18n.register_catalog("en", json!({
//!     "home": { "welcome": "Welcome back, {name}" }
//! })).unwrap();
//!
//! let args = Args::new().with("name", "Alice");
//! assert_eq!(i18n.resolve(Some("en"), "home.welcome", Some(&args)), "Welcome back, Alice");
//! assert_eq!(i18n.t_with("home.welcome", &args), "欢迎回来，Alice");
//! assert_eq!(i18n.t("home.missing"), "home.missing");
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod i18n;
pub mod interpolate;
pub mod loader;
pub mod suggest;

pub use catalog::{Catalog, Node};
pub use config::Config;
pub use error::I18nError;
pub use i18n::{CoverageReport, I18n, LocaleCoverage};
pub use interpolate::{interpolate, ArgValue, Args};
