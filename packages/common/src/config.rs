//! Configuration for the kidset library and CLI
//!
//! Resolution order: built-in defaults, then a JSON config file (explicit path
//! or `KIDSET_CONFIG`), then environment overrides (`KIDSET_STORE_DIR`,
//! `KIDSET_LOG`). CLI flags are applied by the binary on top of the result.

use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "KIDSET_CONFIG";
/// Environment variable overriding the key store directory
pub const STORE_DIR_ENV: &str = "KIDSET_STORE_DIR";
/// Environment variable overriding the log filter
pub const LOG_ENV: &str = "KIDSET_LOG";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        /// Path of the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON for `KidsetConfig`
    #[error("Invalid config file {path}: {source}")]
    Parse {
        /// Path of the config file
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },
}

/// Runtime configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KidsetConfig {
    /// Directory holding one JSON record per key set
    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,
    /// Log filter in `RUST_LOG` syntax; `None` defers to `RUST_LOG`
    #[serde(default)]
    pub log_level: Option<String>,
}

fn default_store_dir() -> PathBuf {
    match dirs::config_dir() {
        Some(mut dir) => {
            dir.push("kidset");
            dir.push("keys");
            dir
        }
        None => {
            warn!("Could not determine OS config directory, using ./kidset/keys");
            PathBuf::from("./kidset/keys")
        }
    }
}

impl Default for KidsetConfig {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            log_level: None,
        }
    }
}

impl KidsetConfig {
    /// Resolve the configuration from an optional file path and the environment
    ///
    /// When neither `path` nor `KIDSET_CONFIG` names a file, defaults are used.
    ///
    /// # Errors
    /// Returns `ConfigError` if the named file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let config = match path.map(Path::to_path_buf).or(env_path) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        Ok(config.with_overrides(
            std::env::var_os(STORE_DIR_ENV).map(PathBuf::from),
            std::env::var(LOG_ENV).ok(),
        ))
    }

    /// Read a JSON config file; absent fields take their defaults
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_slice(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply overrides; `None` keeps the current value
    #[must_use]
    pub fn with_overrides(mut self, store_dir: Option<PathBuf>, log_level: Option<String>) -> Self {
        if let Some(store_dir) = store_dir {
            self.store_dir = store_dir;
        }
        if log_level.is_some() {
            self.log_level = log_level;
        }
        self
    }
}
