//! Scan defaults loaded from an optional YAML file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = ".iacnorm.yaml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Defaults for the scan flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub iac_type: String,
    pub iac_version: String,
    pub cloud: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            iac_type: "terraform".to_string(),
            iac_version: "v12".to_string(),
            cloud: "aws".to_string(),
        }
    }
}

impl ScanConfig {
    /// Load from an explicit path, which must exist.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded scan config from {:?}", path);
        Ok(config)
    }

    /// Load `explicit` if given, else `.iacnorm.yaml` in `cwd` if present,
    /// else built-in defaults.
    pub fn resolve(explicit: Option<&Path>, cwd: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let default_path = cwd.join(DEFAULT_CONFIG_FILE);
        if default_path.is_file() {
            Self::from_file(&default_path)
        } else {
            Ok(Self::default())
        }
    }
}
