//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which holds the bound account address and the registry URL.
//!
//! Configuration is stored at `~/.config/relaycache/config.json`. The
//! environment variables `RELAYCACHE_ADDRESS` and `RELAYCACHE_REGISTRY_URL`
//! take precedence over the file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "relaycache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

const ADDRESS_ENV: &str = "RELAYCACHE_ADDRESS";
const REGISTRY_URL_ENV: &str = "RELAYCACHE_REGISTRY_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub account_address: Option<String>,
    pub registry_url: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn apply_env(&mut self) {
        if let Some(address) = std::env::var(ADDRESS_ENV).ok().filter(|s| !s.is_empty()) {
            self.account_address = Some(address);
        }
        if let Some(url) = std::env::var(REGISTRY_URL_ENV).ok().filter(|s| !s.is_empty()) {
            self.registry_url = Some(url);
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            account_address: Some("0x722256e823bCB92D2C9510Bf185149Ef167f3903".to_string()),
            registry_url: Some("https://registry.example".to_string()),
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"registry_url":"https://registry.example"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(config.account_address.is_none());
        assert_eq!(config.registry_url.as_deref(), Some("https://registry.example"));
    }

    #[test]
    fn test_corrupt_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
