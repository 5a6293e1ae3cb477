//! Catalog loading from disk and the built-in catalogs.

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::I18nError;
use crate::i18n::I18n;

const BUILTIN_ZH: &str = include_str!("../locales/zh.json");
const BUILTIN_EN: &str = include_str!("../locales/en.json");

/// Default locale of the built-in catalogs.
pub const BUILTIN_DEFAULT_LOCALE: &str = "zh";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
}

impl Format {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => Some(Format::Json),
            Some("toml") => Some(Format::Toml),
            _ => None,
        }
    }
}

/// Parse and validate one catalog.
pub fn parse_catalog(locale: &str, content: &str, format: Format) -> Result<Catalog> {
    let tree: Value = match format {
        Format::Json => serde_json::from_str(content)?,
        Format::Toml => {
            let table: toml::Value = toml::from_str(content)?;
            toml_to_json(locale, &mut Vec::new(), table)?
        }
    };
    Ok(Catalog::from_value(locale, tree)?)
}

// Strings and tables only; a datetime would otherwise arrive as a nested object.
fn toml_to_json(locale: &str, path: &mut Vec<String>, value: toml::Value) -> Result<Value, I18nError> {
    let found = match value {
        toml::Value::String(template) => return Ok(Value::String(template)),
        toml::Value::Table(entries) => {
            let mut object = serde_json::Map::with_capacity(entries.len());
            for (key, child) in entries {
                path.push(key.clone());
                let converted = toml_to_json(locale, path, child)?;
                path.pop();
                object.insert(key, converted);
            }
            return Ok(Value::Object(object));
        }
        toml::Value::Integer(_) | toml::Value::Float(_) => "number",
        toml::Value::Boolean(_) => "boolean",
        toml::Value::Array(_) => "array",
        toml::Value::Datetime(_) => "datetime",
    };
    Err(I18nError::MalformedCatalog {
        locale: locale.to_string(),
        path: path.join("."),
        found,
    })
}

/// Load a single catalog file; the file stem is the locale code.
pub fn load_file(path: &Path) -> Result<(String, Catalog)> {
    let format = Format::from_path(path)
        .with_context(|| format!("unsupported catalog file {}", path.display()))?;
    let locale = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .with_context(|| format!("cannot derive locale from {}", path.display()))?
        .to_string();

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog {}", path.display()))?;
    let catalog = parse_catalog(&locale, &content, format)
        .with_context(|| format!("failed to load catalog {}", path.display()))?;
    Ok((locale, catalog))
}

/// Load every `*.json` / `*.toml` catalog in `dir`.
///
/// All-or-nothing: any bad file fails the whole load. Other files are
/// skipped.
pub fn load_dir(dir: &Path) -> Result<HashMap<String, Catalog>> {
    let mut catalogs = HashMap::new();

    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read catalog directory {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() || Format::from_path(&path).is_none() {
            continue;
        }

        let (locale, catalog) = load_file(&path)?;
        debug!(locale = %locale, keys = catalog.len(), path = %path.display(), "loaded catalog");
        if catalogs.insert(locale.clone(), catalog).is_some() {
            bail!("duplicate catalog for locale '{}' in {}", locale, dir.display());
        }
    }

    if catalogs.is_empty() {
        bail!("no catalogs found in {}", dir.display());
    }
    Ok(catalogs)
}

/// The embedded `zh` and `en` catalogs.
pub fn builtin_catalogs() -> Result<HashMap<String, Catalog>> {
    let mut catalogs = HashMap::new();
    for (locale, content) in [("zh", BUILTIN_ZH), ("en", BUILTIN_EN)] {
        let catalog = parse_catalog(locale, content, Format::Json)
            .with_context(|| format!("built-in catalog '{locale}' is invalid"))?;
        catalogs.insert(locale.to_string(), catalog);
    }
    Ok(catalogs)
}

/// Registry over the built-in catalogs with `zh` as default.
pub fn builtin() -> Result<I18n> {
    Ok(I18n::from_catalogs(builtin_catalogs()?, BUILTIN_DEFAULT_LOCALE)?)
}

impl I18n {
    /// Build the registry described by `config` and activate its locale.
    pub fn from_config(config: &Config) -> Result<Self> {
        build(config, &config.get_effective_locale())
    }
}

fn build(config: &Config, requested_locale: &str) -> Result<I18n> {
    let catalogs = match &config.catalog.dir {
        Some(dir) => load_dir(dir)?,
        None => builtin_catalogs()?,
    };
    let default_locale = &config.catalog.default_locale;
    let i18n = I18n::from_catalogs(catalogs, default_locale)
        .with_context(|| format!("default locale '{default_locale}' has no catalog"))?;

    match i18n.match_locale(requested_locale) {
        Some(locale) => i18n.set_active_locale(&locale)?,
        None => warn!(
            requested = requested_locale,
            default = %default_locale,
            "no catalog for requested locale, using default"
        ),
    }
    Ok(i18n)
}
