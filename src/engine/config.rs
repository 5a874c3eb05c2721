//! Shopper configuration
//!
//! Settings come from, highest precedence first: command-line flags, the
//! environment (`SHOPPER_DATA`, handled by clap), a TOML file, then defaults.
//!
//! ```toml
//! # ~/.config/shopper/config.toml
//! data = "/home/me/games/materials.json"
//! prompt = false
//! ```
//!
//! The file is `$SHOPPER_CONFIG` if set, otherwise `shopper/config.toml`
//! under the platform config directory. A missing file is fine.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Store used when nothing else is configured
pub const DEFAULT_STORE: &str = "./materials.json";

#[derive(Debug, Clone, Deserialize, Default)]
struct ConfigToml {
    data: Option<PathBuf>,
    prompt: Option<bool>,
}

/// Resolved settings for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Recipe store to load and save
    pub data: PathBuf,
    /// Ask the operator to define unknown items (otherwise they are errors)
    pub prompt: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: PathBuf::from(DEFAULT_STORE),
            prompt: true,
        }
    }
}

/// Location of the config file, if one can be determined
pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("SHOPPER_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("shopper").join("config.toml"))
}

impl Config {
    /// Defaults overlaid with the config file at [`config_path`]
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Defaults overlaid with the config file at `path`, if it exists
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        if !path.exists() {
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let file: ConfigToml = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if let Some(data) = file.data {
            config.data = data;
        }
        if let Some(prompt) = file.prompt {
            config.prompt = prompt;
        }
        Ok(config)
    }

    /// Apply command-line overrides
    pub fn with_overrides(mut self, data: Option<PathBuf>, no_prompt: bool) -> Self {
        if let Some(data) = data {
            self.data = data;
        }
        if no_prompt {
            self.prompt = false;
        }
        self
    }
}
