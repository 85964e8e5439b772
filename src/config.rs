use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::error::{Result, LocsyncError};

fn default_output_dir() -> String {
    "lang".to_string()
}

fn default_check_locale() -> Option<String> {
    None
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active translation provider name (see ProviderFactory::available)
    pub service: String,
    /// Language the translation keys are written in
    pub source_language: String,
    /// Languages to translate into; empty list falls back to app_locales
    pub target_languages: Vec<String>,
    /// All locales known to the host application
    pub app_locales: Vec<String>,
    /// Locale whose catalog is consulted for missing-key detection.
    /// Defaults to source_language when absent.
    #[serde(default = "default_check_locale", skip_serializing_if = "Option::is_none")]
    pub check_locale: Option<String>,
    /// Directories to scan for translation keys
    pub scan_paths: Vec<String>,
    /// File extensions to scan (multi-dot suffixes like "blade.php" allowed)
    pub file_extensions: Vec<String>,
    /// Regex patterns recognizing key occurrences; one capture group each
    pub patterns: Vec<String>,
    /// Call the translation provider for missing keys
    pub auto_translate: bool,
    /// Value to persist when translation fails
    pub fallback_strategy: FallbackStrategy,
    /// On-disk catalog shape
    pub file_format: CatalogFormat,
    /// Root directory for catalog files
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Per-provider backend settings. Declared last so TOML serialization
    /// emits the scalar keys before the [services] tables.
    #[serde(default)]
    pub services: ServicesConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServicesConfig {
    #[serde(default)]
    pub libretranslate: LibreTranslateSettings,
    #[serde(default)]
    pub mymemory: MyMemorySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibreTranslateSettings {
    /// Instance URL; public instances rate-limit heavily
    pub url: String,
    /// Optional API key for hosted instances
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for LibreTranslateSettings {
    fn default() -> Self {
        Self {
            url: "https://libretranslate.com".to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MyMemorySettings {
    pub url: String,
    /// Contact email; raises the anonymous rate limit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Default for MyMemorySettings {
    fn default() -> Self {
        Self {
            url: "https://api.mymemory.translated.net".to_string(),
            email: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackStrategy {
    /// Persist the key text itself
    Key,
    /// Persist the source-language value
    Source,
    /// Persist an empty string
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogFormat {
    /// One <locale>.json file per locale
    Flat,
    /// <locale>/messages.json under a locale-named directory
    Scoped,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: "dummy".to_string(),
            source_language: "en".to_string(),
            target_languages: vec![],
            app_locales: vec!["en".to_string()],
            check_locale: None,
            scan_paths: vec!["src".to_string(), "templates".to_string()],
            file_extensions: vec!["rs".to_string(), "html".to_string()],
            patterns: vec![
                r#"t!\(\s*"((?:[^"\\]|\\.)+)""#.to_string(),
                r#"__\(\s*"((?:[^"\\]|\\.)+)"\s*\)"#.to_string(),
                r#"trans\(\s*"((?:[^"\\]|\\.)+)"\s*\)"#.to_string(),
            ],
            auto_translate: false,
            fallback_strategy: FallbackStrategy::Key,
            file_format: CatalogFormat::Flat,
            output_dir: default_output_dir(),
            services: ServicesConfig::default(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LocsyncError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| LocsyncError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| LocsyncError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| LocsyncError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Locale consulted when deciding whether a key counts as missing
    pub fn check_locale(&self) -> &str {
        self.check_locale.as_deref().unwrap_or(&self.source_language)
    }

    /// Target languages minus the source language, falling back to app_locales
    pub fn effective_targets(&self) -> Vec<String> {
        let candidates = if self.target_languages.is_empty() {
            self.app_locales.clone()
        } else {
            self.target_languages.clone()
        };

        candidates
            .into_iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty() && *l != self.source_language)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_targets_excludes_source() {
        let mut config = Config::default();
        config.target_languages = vec!["en".to_string(), "es".to_string(), "fr".to_string()];
        assert_eq!(config.effective_targets(), vec!["es", "fr"]);
    }

    #[test]
    fn test_effective_targets_falls_back_to_app_locales() {
        let mut config = Config::default();
        config.app_locales = vec!["en".to_string(), "de".to_string()];
        assert_eq!(config.effective_targets(), vec!["de"]);
    }

    #[test]
    fn test_check_locale_defaults_to_source() {
        let mut config = Config::default();
        assert_eq!(config.check_locale(), "en");
        config.check_locale = Some("ar".to_string());
        assert_eq!(config.check_locale(), "ar");
    }

    #[test]
    fn test_unknown_format_rejected() {
        let toml_str = r#"
            service = "dummy"
            source_language = "en"
            target_languages = []
            app_locales = ["en"]
            scan_paths = ["src"]
            file_extensions = ["rs"]
            patterns = []
            auto_translate = false
            fallback_strategy = "key"
            file_format = "yaml"

            [services]
        "#;
        assert!(toml::from_str::<Config>(toml_str).is_err());
    }

    #[test]
    fn test_default_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.service, "dummy");
        assert_eq!(parsed.file_format, CatalogFormat::Flat);
    }
}
