//! Optional `taskline.toml` configuration.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

const CONFIG_FILE: &str = "taskline.toml";

/// Top-level configuration loaded from `taskline.toml` in the working
/// directory. A missing file yields the defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Storage location block.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from `workdir`, falling back to defaults
    /// when no config file exists.
    ///
    /// # Errors
    /// Returns an error when the file exists but cannot be read or
    /// parsed.
    pub fn load(workdir: impl AsRef<Path>) -> Result<Self> {
        let config_path = workdir.as_ref().join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;
        Ok(config)
    }
}

/// Where the task data file lives.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the data file. Created on first run.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
    /// Name of the data file inside `dir`.
    #[serde(default = "default_file")]
    pub file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            file: default_file(),
        }
    }
}

impl StorageConfig {
    /// Data directory after applying the CLI override.
    #[must_use]
    pub fn data_dir(&self, override_dir: Option<String>) -> PathBuf {
        override_dir.map_or_else(|| self.dir.clone(), PathBuf::from)
    }
}

fn default_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_file() -> PathBuf {
    PathBuf::from("taskData.txt")
}
