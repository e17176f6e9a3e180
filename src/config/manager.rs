//! Configuration manager for loading and saving application configuration
//!
//! Configuration lives in `<app-data>/FabBanana/config.json` with atomic
//! writes to prevent corruption. The app-data root is `%APPDATA%` on
//! Windows and `$XDG_CONFIG_HOME` (falling back to `~/.config`) elsewhere.

use crate::config::models::AppConfig;
use crate::error::{FabBananaError, Result, StringError};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

/// Configuration manager
pub struct ConfigManager;

impl ConfigManager {
    /// Get the application data directory: `<app-data>/FabBanana`
    pub fn app_data_dir() -> PathBuf {
        let root = std::env::var("APPDATA")
            .or_else(|_| std::env::var("XDG_CONFIG_HOME"))
            .map(PathBuf::from)
            .or_else(|_| {
                std::env::var("HOME").map(|home| PathBuf::from(home).join(".config"))
            })
            .unwrap_or_else(|_| PathBuf::from("."));
        root.join("FabBanana")
    }

    /// Get the path to the configuration file
    pub fn get_config_path() -> PathBuf {
        Self::app_data_dir().join("config.json")
    }

    /// Ensure the configuration directory exists
    pub fn ensure_config_dir() -> Result<PathBuf> {
        let config_dir = Self::app_data_dir();
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    /// Load configuration from disk
    ///
    /// If the configuration file doesn't exist or is corrupt, returns default configuration.
    pub fn load() -> Result<AppConfig> {
        let config_path = Self::get_config_path();

        if !config_path.exists() {
            info!("Configuration file not found, using defaults");
            return Ok(AppConfig::default());
        }

        let json = std::fs::read_to_string(&config_path)?;

        match serde_json::from_str(&json) {
            Ok(config) => {
                info!("Configuration loaded successfully");
                Ok(config)
            }
            Err(e) => {
                warn!("Failed to parse configuration, using defaults: {}", e);
                Ok(AppConfig::default())
            }
        }
    }

    /// Save configuration to disk with atomic write
    ///
    /// Writes to a temporary file in the config directory and renames it into
    /// place so a crash mid-write never leaves a truncated config behind.
    pub fn save(config: &AppConfig) -> Result<()> {
        let config_path = Self::get_config_path();
        let config_dir = Self::ensure_config_dir()?;

        let json = serde_json::to_string_pretty(config)?;

        let mut temp = tempfile::NamedTempFile::new_in(&config_dir)?;
        temp.write_all(json.as_bytes())?;
        temp.persist(&config_path).map_err(|e| {
            FabBananaError::ConfigError(StringError::new(format!(
                "failed to persist configuration: {e}"
            )))
        })?;

        info!("Configuration saved successfully");
        Ok(())
    }
}
