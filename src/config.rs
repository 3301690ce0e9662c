//! Configuration management for quotebox
//!
//! Handles loading, saving, and default configuration values.
//! Config file location: ~/.config/quotebox/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetch: FetchConfig,
    pub display: DisplayConfig,
    pub storage: StorageConfig,
    pub log: LogConfig,
}

impl Config {
    /// Get the default config file path
    pub fn path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("quotebox");
        Ok(config_dir.join("config.toml"))
    }

    /// Load config from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load config from file, or create default if not exists
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {:?}", path))
    }

    /// Save config to file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }
}

/// Remote quote endpoint and retry budget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub endpoint: String,
    pub filtered_attempts: u32,
    pub attempt_timeout_ms: u64,
    pub retry_delay_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://dummyjson.com/quotes/random".into(),
            filtered_attempts: 12,
            attempt_timeout_ms: 5000,
            retry_delay_ms: 120,
        }
    }
}

/// Transition timing and share link template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub fade_ms: u64,
    pub save_confirm_ms: u64,
    pub share_url: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fade_ms: 250,
            save_confirm_ms: 1500,
            share_url: "https://twitter.com/intent/tweet?text=".into(),
        }
    }
}

impl DisplayConfig {
    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }

    pub fn save_confirm(&self) -> Duration {
        Duration::from_millis(self.save_confirm_ms)
    }
}

/// Where favorites and the theme preference are kept
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Overrides ~/.local/share/quotebox
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter when RUST_LOG is unset
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: "info".into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.fetch.filtered_attempts, 12);
        assert_eq!(config.fetch.attempt_timeout_ms, 5000);
        assert_eq!(config.fetch.retry_delay_ms, 120);
        assert_eq!(config.display.save_confirm(), Duration::from_millis(1500));
        assert_eq!(config.display.share_url, "https://twitter.com/intent/tweet?text=");
        assert!(config.storage.dir.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [fetch]
            filtered_attempts = 3

            [display]
            fade_ms = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.fetch.filtered_attempts, 3);
        assert_eq!(config.fetch.endpoint, FetchConfig::default().endpoint);
        assert_eq!(config.display.fade_ms, 0);
        assert_eq!(config.display.save_confirm_ms, 1500);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quotebox").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "fetch = [not toml").unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
