//! Configuration file support for episode-browser.
//!
//! This module provides functionality for loading and saving settings
//! from a TOML configuration file.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Upper bound for `max_retries`.
pub const MAX_RETRIES: u32 = 10;

/// User configuration settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Base URL of the catalog API
    #[serde(default = "default_catalog_base")]
    pub catalog_base: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries for timeouts, connection failures and server errors
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay between retries in milliseconds (doubles each retry)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn default_catalog_base() -> String {
    "https://api.tvmaze.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    500
}

impl Config {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self {
            catalog_base: default_catalog_base(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }

    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base retry delay as a [`Duration`].
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Get the path to the config file.
    ///
    /// Returns ~/.config/episode-browser/config.toml on Linux,
    /// or a platform-appropriate location on other systems.
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "Could not find config directory")
            })?
            .join("episode-browser");

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from disk.
    ///
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::get_config_path()?;

        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(&path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check a config, including one merged with command-line overrides.
    pub fn validate(&self) -> Result<()> {
        let base = self.catalog_base.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "catalog_base must be an http(s) URL, got '{}'",
                self.catalog_base
            )));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::Config(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.max_retries > MAX_RETRIES {
            return Err(AppError::Config(format!(
                "max_retries must be at most {}, got {}",
                MAX_RETRIES, self.max_retries
            )));
        }
        Ok(())
    }

    /// Save config to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        let path = Self::get_config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Create a default config file if one doesn't exist.
    ///
    /// Returns the path to the config file.
    pub fn create_default_if_missing() -> Result<PathBuf> {
        let path = Self::get_config_path()?;

        if !path.exists() {
            Self::new().save()?;
        }

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_config_has_defaults() {
        let config = Config::new();
        assert_eq!(config.catalog_base, "https://api.tvmaze.com");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_delay_ms, 500);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_config_serialization() {
        let config = Config {
            catalog_base: "http://localhost:8080".to_string(),
            timeout_secs: 5,
            max_retries: 0,
            retry_delay_ms: 100,
        };

        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("catalog_base = \"http://localhost:8080\""));
        assert!(toml_str.contains("timeout_secs = 5"));
        assert!(toml_str.contains("max_retries = 0"));
    }

    #[test]
    fn test_config_partial_deserialization() {
        let toml_str = r#"
            timeout_secs = 10
        "#;

        let config = Config::from_toml(toml_str).unwrap();
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.catalog_base, "https://api.tvmaze.com"); // default
        assert_eq!(config.max_retries, 3); // default
    }

    #[test]
    fn test_config_rejects_non_http_base() {
        let err = Config::from_toml("catalog_base = \"ftp://example.com\"").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_config_rejects_zero_timeout() {
        let err = Config::from_toml("timeout_secs = 0").unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_config_rejects_excessive_retries() {
        let err = Config::from_toml("max_retries = 40").unwrap_err();
        assert!(err.to_string().contains("max_retries"));
        assert!(Config::from_toml("max_retries = 10").is_ok());
    }

    #[test]
    fn test_validate_catches_overridden_timeout() {
        let mut config = Config::new();
        assert!(config.validate().is_ok());
        config.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_config_malformed_toml() {
        let err = Config::from_toml("timeout_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
