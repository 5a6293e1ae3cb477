use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding `catalog.locale`.
pub const LOCALE_ENV: &str = "MSGCAT_LOCALE";

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CatalogConfig {
    // Directory of <locale>.json / <locale>.toml files; built-in catalogs when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    pub default_locale: String,
    // "auto" (detect from LANG) or a locale code
    pub locale: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            dir: None,
            default_locale: "zh".to_string(),
            locale: "auto".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DisplayConfig {
    pub max_suggestions: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { max_suggestions: 5 }
    }
}

impl Config {
    /// Load from `~/.msgcat/config.toml`, writing defaults there on first use.
    pub fn new() -> Result<Self> {
        Self::load(&Self::get_config_path())
    }

    /// Load from `path`, writing defaults there if it doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("invalid config {}", path.display()))?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save(path)?;
            Ok(config)
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(config_dir) = path.parent() {
            fs::create_dir_all(config_dir)
                .with_context(|| format!("failed to create {}", config_dir.display()))?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("failed to write config {}", path.display()))?;
        Ok(())
    }

    pub fn get_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".msgcat")
            .join("config.toml")
    }

    /// Locale string to activate, before matching against registered catalogs.
    pub fn get_effective_locale(&self) -> String {
        self.effective_locale_with(std::env::var(LOCALE_ENV).ok(), std::env::var("LANG").ok())
    }

    fn effective_locale_with(&self, env_override: Option<String>, lang: Option<String>) -> String {
        if let Some(locale) = env_override.filter(|l| !l.trim().is_empty()) {
            return locale;
        }
        if self.catalog.locale == "auto" {
            // Try to get system language
            lang.as_deref()
                .and_then(|l| l.split('.').next())
                .filter(|l| !l.is_empty() && *l != "C" && *l != "POSIX")
                .map(str::to_string)
                .unwrap_or_else(|| self.catalog.default_locale.clone())
        } else {
            self.catalog.locale.clone()
        }
    }
}
