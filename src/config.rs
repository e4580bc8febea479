//! Configuration loading and management
//!
//! Handles parsing of the `~/.todo.toml` configuration file. The file is
//! optional; a missing file means defaults, a malformed one is an error.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Config file name under the home directory.
pub const CONFIG_FILE_NAME: &str = ".todo.toml";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "TODO_CONFIG";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Default assignee for new tasks
    #[serde(default)]
    pub owner: String,

    /// Override for the task data file location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a specific file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the user's configuration, or defaults when no file exists.
    ///
    /// The file is `$TODO_CONFIG` when set, otherwise `~/.todo.toml`.
    pub fn load_default() -> Result<Self> {
        let Some(path) = config_path() else {
            return Ok(Config::default());
        };
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Config::default())
        }
    }

    fn validate(&self) -> Result<()> {
        if let Some(data_file) = &self.data_file {
            if data_file.as_os_str().is_empty() {
                return Err(Error::InvalidConfig(
                    "data_file cannot be empty".to_string(),
                ));
            }
            if data_file.is_dir() {
                return Err(Error::InvalidConfig(format!(
                    "data_file points at a directory: {}",
                    data_file.display()
                )));
            }
        }
        Ok(())
    }
}

/// Resolve the config file path, honoring `$TODO_CONFIG`.
pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    home_dir().map(|home| home.join(CONFIG_FILE_NAME))
}

/// The user's home directory.
pub fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}
