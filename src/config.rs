use std::path::PathBuf;

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub default_lang: Option<String>,
    pub default_model: Option<String>,
}

impl Config {
    /// Load config from ~/.config/ytsum/config.toml if it exists
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytsum")
        .join("config.toml")
}
