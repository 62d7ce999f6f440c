//! Configuration handling
//!
//! A small global config lives at `~/.config/twig/config.toml` (platform
//! equivalent via `directories`). The only setting that matters to the
//! engine is where the task file lives; the `--file` flag and `TWIG_FILE`
//! environment variable take precedence over it.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Task file location; overrides the platform data-dir default
    pub data_file: Option<PathBuf>,
}

impl Config {
    /// Loads the configuration, falling back to defaults when absent
    pub fn load() -> Result<Self> {
        let Some(dirs) = Self::project_dirs() else {
            return Ok(Self::default());
        };

        let config_path = dirs.config_dir().join("config.toml");
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse config")
    }

    /// Resolves the task file path
    ///
    /// Precedence: explicit override (flag/env) > config file > platform
    /// data directory.
    pub fn resolve_data_file(&self, override_path: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = override_path {
            return Ok(path);
        }
        if let Some(path) = &self.data_file {
            return Ok(path.clone());
        }
        let dirs = Self::project_dirs()
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(dirs.data_dir().join("tasks.json"))
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("dev", "twig", "twig")
    }
}
