//! Configuration for the key code viewer

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::tty::RawMode;

/// Viewer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How far raw mode strips the line discipline
    pub raw_mode: RawMode,
    /// Wait for the rest of an escape sequence, in tenths of a second
    pub escape_timeout_tenths: u8,
    /// Character that ends the session
    pub quit_byte: u8,
    /// Print the console size and a column ruler on startup
    pub show_ruler: bool,
    /// Print the raw bytes of every recognised key
    pub show_sequences: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            raw_mode: RawMode::default(),
            escape_timeout_tenths: 1,
            quit_byte: b'q',
            show_ruler: true,
            show_sequences: true,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from default location or return default config
    pub fn load_or_default() -> Self {
        // Try to load from ~/.config/keycode/config.json
        if let Some(config_path) = default_path() {
            if config_path.exists() {
                match Self::load(&config_path) {
                    Ok(config) => return config,
                    Err(e) => warn!("Ignoring {}: {}", config_path.display(), e),
                }
            }
        }
        Self::default()
    }
}

/// Path of the default configuration file
pub fn default_path() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("keycode")
            .join("config.json")
    })
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
