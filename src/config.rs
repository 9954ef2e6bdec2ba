//! Tracker configuration
//!
//! Read from `config.toml` in the platform config directory:
//! - Linux: `~/.config/learntrack/config.toml`
//! - macOS: `~/Library/Application Support/learntrack/config.toml`
//! - Windows: `%APPDATA%\learntrack\config.toml`
//!
//! Every field is optional; a missing file means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::flashcards::stats::DEFAULT_MASTERED_AFTER_DAYS;
use crate::storage::FileStorage;

const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct TrackerConfig {
    /// Where the store is persisted (platform data dir when unset)
    pub data_dir: Option<PathBuf>,
    /// Where exports are written (current directory when unset)
    pub export_dir: Option<PathBuf>,
    /// Cards with a longer interval count as mastered
    pub mastered_after_days: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            export_dir: None,
            mastered_after_days: DEFAULT_MASTERED_AFTER_DAYS,
        }
    }
}

impl TrackerConfig {
    /// Path of the default config file, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("learntrack").join(CONFIG_FILENAME))
    }

    /// Load the config at `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(content) => {
                let config = toml::from_str(&content)?;
                log::info!("Loaded config from {:?}", path);
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config file at {:?}, using defaults", path);
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Load from the default location, falling back to defaults when the
    /// platform has no config dir
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => {
                log::warn!("Could not determine config path, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Save the config, creating the parent directory if needed
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Persistence gateway for the configured data dir
    pub fn file_storage(&self) -> Result<FileStorage, crate::storage::PersistenceError> {
        let dir = match &self.data_dir {
            Some(dir) => dir.clone(),
            None => FileStorage::default_data_dir()?,
        };
        Ok(FileStorage::new(dir))
    }
}
