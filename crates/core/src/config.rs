//! Runtime configuration loaded from a TOML file.
//!
//! ```toml
//! api_key = "..."
//! save_location = "decks"
//! template_dir = "templates"
//! image_cache = "image-cache"
//! ```

use crate::error::{Error, Result};
use crate::types::Theme;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable consulted when the file has no `api_key`.
pub const API_KEY_ENV: &str = "COHERE_API_KEY";

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "deckgen.toml";

/// Default base URL of the content generation API.
pub const DEFAULT_API_BASE: &str = "https://api.cohere.com";

/// Configuration file contents before validation.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    save_location: Option<PathBuf>,
    #[serde(default)]
    template_dir: Option<PathBuf>,
    #[serde(default)]
    image_cache: Option<PathBuf>,
    #[serde(default)]
    api_base: Option<String>,
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Key for the content generation API.
    pub api_key: String,

    /// Root directory under which per-topic storage directories are created.
    pub save_location: PathBuf,

    /// Directory holding the theme templates.
    pub template_dir: PathBuf,

    /// Directory of previously crawled images, if any.
    pub image_cache: Option<PathBuf>,

    /// Base URL of the content generation API.
    pub api_base: String,
}

impl Config {
    /// Load configuration from a TOML file, falling back to the environment for the API key.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content, std::env::var(API_KEY_ENV).ok())
    }

    /// Parse configuration text. `env_api_key` is used when the text has no key.
    pub fn from_toml(content: &str, env_api_key: Option<String>) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {}", e)))?;

        let api_key = raw
            .api_key
            .or(env_api_key)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                Error::ConfigError(format!("api_key is not set (file or {})", API_KEY_ENV))
            })?;

        let save_location = raw
            .save_location
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| Error::ConfigError("save_location is not set".to_string()))?;

        Ok(Self {
            api_key,
            save_location,
            template_dir: raw.template_dir.unwrap_or_else(|| PathBuf::from("templates")),
            image_cache: raw.image_cache,
            api_base: raw
                .api_base
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        })
    }

    /// Path of the template file for a theme.
    pub fn template_path(&self, theme: Theme) -> PathBuf {
        self.template_dir.join(theme.template_file_name())
    }

    /// Storage directory for a sanitized topic.
    pub fn storage_dir(&self, legal_topic: &str) -> PathBuf {
        self.save_location.join(legal_topic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let config = Config::from_toml(
            r#"
            api_key = "secret"
            save_location = "/tmp/decks"
            template_dir = "themes"
            image_cache = "/var/cache/images"
            "#,
            None,
        )
        .unwrap();

        assert_eq!(config.api_key, "secret");
        assert_eq!(config.save_location, PathBuf::from("/tmp/decks"));
        assert_eq!(config.image_cache, Some(PathBuf::from("/var/cache/images")));
        assert_eq!(config.template_path(Theme::Dark), PathBuf::from("themes/theme1.pptx"));
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("api_key = \"k\"\nsave_location = \"out\"", None).unwrap();
        assert_eq!(config.template_dir, PathBuf::from("templates"));
        assert_eq!(config.image_cache, None);
        assert_eq!(config.storage_dir("Rust_Tips"), PathBuf::from("out/Rust_Tips"));
    }

    #[test]
    fn test_api_key_from_env() {
        let config =
            Config::from_toml("save_location = \"out\"", Some("from-env".to_string())).unwrap();
        assert_eq!(config.api_key, "from-env");

        let config =
            Config::from_toml("api_key = \"file\"\nsave_location = \"out\"", Some("env".to_string()))
                .unwrap();
        assert_eq!(config.api_key, "file");
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = Config::from_toml("save_location = \"out\"", None).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));

        let err = Config::from_toml("api_key = \"  \"\nsave_location = \"out\"", None).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_missing_save_location_is_fatal() {
        let err = Config::from_toml("api_key = \"k\"", None).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "api_key = \"k\"\nsave_location = \"out\"").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.save_location, PathBuf::from("out"));

        let err = Config::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }
}
