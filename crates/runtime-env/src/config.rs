//! Display configuration.
//!
//! Stored as JSON in the user's config directory:
//! - macOS: ~/Library/Application Support/runt/runtime-env.json
//! - Linux: ~/.config/runt/runtime-env.json
//! - Windows: C:\Users\<User>\AppData\Roaming\runt\runtime-env.json

use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{EnvInfoError, Result};

/// Label used when no config overrides it.
pub const DEFAULT_RUNTIME_LABEL: &str = "Python";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Word naming the runtime in display names ("Python 3.12.0").
    pub runtime_label: String,
    /// Replace the home directory with `~` in diagnostics.
    pub shorten_home: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            runtime_label: DEFAULT_RUNTIME_LABEL.to_string(),
            shorten_home: true,
        }
    }
}

/// Get the path to the config file
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("runt")
        .join("runtime-env.json")
}

impl DisplayConfig {
    /// Load from [`config_path`], returning defaults if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_or_default(&config_path())
    }

    /// Like [`load_from`](Self::load_from), but a missing file yields defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            debug!("No display config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config_error = |source: anyhow::Error| EnvInfoError::Config {
            path: path.to_path_buf(),
            source,
        };
        let contents = std::fs::read_to_string(path).map_err(|e| config_error(e.into()))?;
        serde_json::from_str(&contents).map_err(|e| config_error(e.into()))
    }
}
