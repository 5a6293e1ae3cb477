//! Locale registry and key resolution.
//!
//! `I18n` owns every catalog plus the default and active locale. Lookups
//! try the requested (or active) locale, then the default locale, then
//! echo the key path back so missing text shows up on screen.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::error::{I18nError, Result};
use crate::interpolate::{interpolate, Args};

pub struct I18n {
    catalogs: HashMap<String, Catalog>,
    default_locale: String,
    active_locale: RwLock<String>,
}

impl I18n {
    /// Create a registry whose default (and initially active) locale is
    /// `default_locale`, backed by `catalog`.
    pub fn new(default_locale: &str, catalog: Catalog) -> Self {
        let mut catalogs = HashMap::new();
        catalogs.insert(default_locale.to_string(), catalog);
        Self {
            catalogs,
            default_locale: default_locale.to_string(),
            active_locale: RwLock::new(default_locale.to_string()),
        }
    }

    /// Build a registry from already-validated catalogs.
    pub fn from_catalogs(catalogs: HashMap<String, Catalog>, default_locale: &str) -> Result<Self> {
        if !catalogs.contains_key(default_locale) {
            return Err(I18nError::UnknownLocale(default_locale.to_string()));
        }
        Ok(Self {
            catalogs,
            default_locale: default_locale.to_string(),
            active_locale: RwLock::new(default_locale.to_string()),
        })
    }

    /// Validate `tree` and add or replace the catalog for `locale`.
    ///
    /// On error the registry is left untouched.
    pub fn register_catalog(&mut self, locale: &str, tree: Value) -> Result<()> {
        let catalog = Catalog::from_value(locale, tree)?;
        self.register(locale, catalog);
        Ok(())
    }

    /// Add or replace a prebuilt catalog.
    pub fn register(&mut self, locale: &str, catalog: Catalog) {
        let keys = catalog.len();
        if self.catalogs.insert(locale.to_string(), catalog).is_some() {
            info!(locale, keys, "replaced catalog");
        } else {
            info!(locale, keys, "registered catalog");
        }
    }

    /// Switch the locale used by lookups that don't name one.
    pub fn set_active_locale(&self, locale: &str) -> Result<()> {
        if !self.catalogs.contains_key(locale) {
            return Err(I18nError::UnknownLocale(locale.to_string()));
        }
        let mut active = self
            .active_locale
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if *active != locale {
            info!(from = %active, to = locale, "active locale changed");
            *active = locale.to_string();
        }
        Ok(())
    }

    pub fn active_locale(&self) -> String {
        self.active_locale
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Registered locale codes, sorted.
    pub fn locales(&self) -> Vec<&str> {
        let mut locales: Vec<&str> = self.catalogs.keys().map(String::as_str).collect();
        locales.sort_unstable();
        locales
    }

    pub fn catalog(&self, locale: &str) -> Option<&Catalog> {
        self.catalogs.get(locale)
    }

    /// Whether `key` resolves in `locale` itself, without fallback.
    pub fn contains(&self, locale: &str, key: &str) -> bool {
        self.catalogs
            .get(locale)
            .and_then(|catalog| catalog.lookup(key))
            .is_some()
    }

    /// Resolve `key` to display text.
    ///
    /// `locale == None` uses the active locale; an unregistered locale uses
    /// the default one. Falls back to the default catalog when the key is
    /// missing, and to `key` itself when nothing has it. Never fails.
    pub fn resolve(&self, locale: Option<&str>, key: &str, args: Option<&Args>) -> String {
        match self.lookup(locale, key) {
            Some(template) => match args {
                Some(args) => interpolate(template, args),
                None => template.to_string(),
            },
            None => {
                warn!(key, locale = %self.select_locale(locale), "missing translation");
                key.to_string()
            }
        }
    }

    /// The raw template `resolve` would interpolate, or `None` when it
    /// would echo the key.
    pub fn lookup(&self, locale: Option<&str>, key: &str) -> Option<&str> {
        let selected = self.select_locale(locale);
        self.lookup_in(&selected, key).or_else(|| {
            if selected == self.default_locale {
                return None;
            }
            let found = self.lookup_in(&self.default_locale, key);
            if found.is_some() {
                debug!(key, locale = %selected, fallback = %self.default_locale, "key resolved via default locale");
            }
            found
        })
    }

    /// The locale whose catalog a lookup starts from.
    pub fn select_locale(&self, locale: Option<&str>) -> String {
        let requested = match locale {
            Some(code) => code.to_string(),
            None => self.active_locale(),
        };
        if self.catalogs.contains_key(&requested) {
            requested
        } else {
            self.default_locale.clone()
        }
    }

    /// Resolve in the active locale with no arguments.
    pub fn t(&self, key: &str) -> String {
        self.resolve(None, key, None)
    }

    /// Resolve in the active locale with arguments.
    pub fn t_with(&self, key: &str, args: &Args) -> String {
        self.resolve(None, key, Some(args))
    }

    fn lookup_in(&self, locale: &str, key: &str) -> Option<&str> {
        self.catalogs.get(locale)?.lookup(key)
    }

    /// Map a system locale string to a registered locale code.
    ///
    /// Accepts forms like `zh_CN.UTF-8`, `en-US`, `zh@latin` and a few
    /// language names (`chinese`, `english`). Tries the full tag first,
    /// then the primary language subtag.
    pub fn match_locale(&self, raw: &str) -> Option<String> {
        let tag = raw
            .split(['.', '@'])
            .next()
            .unwrap_or_default()
            .trim()
            .replace('-', "_")
            .to_lowercase();
        if tag.is_empty() {
            return None;
        }

        let alias = match tag.as_str() {
            "cn" | "chinese" => Some("zh"),
            "english" => Some("en"),
            _ => None,
        };
        let primary = tag.split('_').next().unwrap_or_default();

        let matched = [tag.as_str(), alias.unwrap_or(primary), primary]
            .into_iter()
            .find_map(|candidate| {
                self.catalogs
                    .keys()
                    .find(|code| code.replace('-', "_").to_lowercase() == candidate)
                    .cloned()
            });
        matched
    }

    /// Keys of the default catalog that `locale` does not define itself.
    ///
    /// An unregistered locale is missing everything.
    pub fn missing_keys(&self, locale: &str) -> Vec<String> {
        let reference = match self.catalogs.get(&self.default_locale) {
            Some(catalog) => catalog.keys(),
            None => return Vec::new(),
        };
        reference
            .into_iter()
            .filter(|key| !self.contains(locale, key))
            .collect()
    }

    /// Per-locale coverage against the default catalog's keys.
    pub fn coverage_report(&self) -> CoverageReport {
        let total_keys = self
            .catalogs
            .get(&self.default_locale)
            .map(Catalog::len)
            .unwrap_or(0);

        let locales = self
            .locales()
            .into_iter()
            .map(|locale| {
                let missing = self.missing_keys(locale);
                let present = total_keys.saturating_sub(missing.len());
                let coverage_percent = if total_keys == 0 {
                    100.0
                } else {
                    present as f32 / total_keys as f32 * 100.0
                };
                let extra: Vec<String> = self
                    .catalogs
                    .get(locale)
                    .map(|catalog| {
                        catalog
                            .keys()
                            .into_iter()
                            .filter(|key| !self.contains(&self.default_locale, key))
                            .collect()
                    })
                    .unwrap_or_default();
                LocaleCoverage {
                    locale: locale.to_string(),
                    present,
                    missing,
                    extra,
                    coverage_percent,
                }
            })
            .collect();

        CoverageReport {
            default_locale: self.default_locale.clone(),
            total_keys,
            locales,
        }
    }
}

/// Coverage of every locale relative to the default catalog.
#[derive(Debug, Clone)]
pub struct CoverageReport {
    pub default_locale: String,
    /// Leaf count of the default catalog.
    pub total_keys: usize,
    pub locales: Vec<LocaleCoverage>,
}

impl CoverageReport {
    pub fn is_complete(&self) -> bool {
        self.locales.iter().all(|l| l.missing.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct LocaleCoverage {
    pub locale: String,
    pub present: usize,
    /// Default-catalog keys this locale lacks (served by fallback).
    pub missing: Vec<String>,
    /// Keys only this locale defines; unreachable from the default locale.
    pub extra: Vec<String>,
    pub coverage_percent: f32,
}
