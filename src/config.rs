//! Configuration loading and management
//!
//! Handles parsing of `config.toml` in the data directory.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::storage::{validate_slot, DEFAULT_SLOT};
use crate::task::CorruptPolicy;
use crate::view::{Filter, Sort};

/// File name looked up inside the data directory
pub const CONFIG_FILE: &str = "config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Persistence settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Initial view selectors
    #[serde(default)]
    pub view: ViewConfig,
}

/// Persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Slot holding the task list
    #[serde(default = "default_slot")]
    pub slot: String,

    /// Behavior when the slot cannot be parsed
    #[serde(default)]
    pub on_corrupt: CorruptPolicy,

    /// How long to wait for the slot lock
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_slot() -> String {
    DEFAULT_SLOT.to_string()
}

fn default_lock_timeout_ms() -> u64 {
    crate::lock::DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            slot: default_slot(),
            on_corrupt: CorruptPolicy::default(),
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

/// Selector values the viewer and `list` start from
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub filter: Filter,

    #[serde(default)]
    pub sort: Sort,
}

impl Config {
    /// Load and validate a config file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `config.toml` from the data directory, or return defaults
    pub fn load_from_dir(dir: &Path) -> Self {
        let config_path = dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load(&config_path) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %config_path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> crate::error::Result<()> {
        validate_slot(&self.storage.slot).map_err(|_| {
            crate::error::Error::InvalidConfig(format!(
                "storage.slot '{}' must match [A-Za-z0-9_-]+",
                self.storage.slot
            ))
        })?;
        if self.storage.lock_timeout_ms == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "storage.lock_timeout_ms must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
