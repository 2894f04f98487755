//! Loading [`PetConfig`] from JSON.

use std::io::Read;
use std::path::Path;

pub use blobpet_logic::config::{LongPressMode, PetConfig};

/// Read and validate a config. Missing fields take their defaults.
pub fn load_config<R: Read>(reader: R) -> Result<PetConfig, ConfigError> {
    let config: PetConfig = serde_json::from_reader(reader)?;
    config.validate().map_err(ConfigError::Invalid)?;
    Ok(config)
}

pub fn load_config_file(path: impl AsRef<Path>) -> Result<PetConfig, ConfigError> {
    let file = std::fs::File::open(path)?;
    load_config(std::io::BufReader::new(file))
}

/// Errors that can occur while loading a config
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Json(e) => write!(f, "Config parse error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
