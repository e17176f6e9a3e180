//! Configuration data models
//!
//! This module defines the data structures used for application configuration.
//! Session state (selected mode, files, prompt) is deliberately not part of
//! the configuration and never persists across runs.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Connection settings for the generation server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the FabBanana API server
    pub base_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Generation server settings
    pub server: ServerConfig,
    /// User preferences
    pub preferences: UserPreferences,
    /// Window state for persistence
    pub window_state: WindowState,
}

/// User preferences and settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Directory the save dialog opens in; `None` uses the platform default
    pub default_output_dir: Option<PathBuf>,
    /// Whether to remember the directory of the last save as the new default
    pub remember_output_dir: bool,
}

/// Window state for position and size persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowState {
    /// X position
    pub x: i32,
    /// Y position
    pub y: i32,
    /// Window width
    pub width: u32,
    /// Window height
    pub height: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            // Port the reference server binds to when PORT is unset
            base_url: "http://127.0.0.1:5001".to_string(),
            request_timeout_secs: 120,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            preferences: UserPreferences::default(),
            window_state: WindowState::default(),
        }
    }
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            default_output_dir: None,
            remember_output_dir: true,
        }
    }
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            x: 100,
            y: 100,
            width: 900,
            height: 640,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.base_url, "http://127.0.0.1:5001");
        assert_eq!(config.server.request_timeout_secs, 120);
        assert!(config.preferences.default_output_dir.is_none());
    }

    #[test]
    fn test_serialization() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.server.base_url, deserialized.server.base_url);
        assert_eq!(
            config.preferences.remember_output_dir,
            deserialized.preferences.remember_output_dir
        );
    }

    #[test]
    fn test_window_state_round_trip() {
        let state = WindowState {
            x: -10,
            y: 20,
            width: 1280,
            height: 720,
        };
        let json = serde_json::to_string(&state).unwrap();
        let back: WindowState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.x, -10);
        assert_eq!(back.width, 1280);
    }
}
