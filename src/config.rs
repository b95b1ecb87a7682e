use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use log::debug;

use crate::error::HashError;
use crate::hasher::HashAlgorithm;

pub const DEFAULT_CONFIG_PATH: &str = "rusbit.toml";
pub const DEFAULT_PIECE_LENGTH: u64 = 16 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub piece_length: u64,
    pub algorithm: HashAlgorithm,
    pub show_progress: bool,
    pub output_directory: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            piece_length: DEFAULT_PIECE_LENGTH, // bytes
            algorithm: HashAlgorithm::Sha1,
            show_progress: true,
            output_directory: ".".to_string(),
        }
    }
}

impl Config {
    /// Reads the config at `path`, falling back to defaults when the file
    /// does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, HashError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| HashError::Config(format!("reading {:?}: {}", path, e)))?;
        let config: Config = toml::from_str(&contents)
            .map_err(|e| HashError::Config(format!("parsing {:?}: {}", path, e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), HashError> {
        let path = path.as_ref();
        let toml = toml::to_string(self).map_err(|e| HashError::Config(e.to_string()))?;
        fs::write(path, toml).map_err(|e| HashError::Config(format!("writing {:?}: {}", path, e)))
    }

    pub fn validate(&self) -> Result<(), HashError> {
        if self.piece_length == 0 {
            return Err(HashError::InvalidPieceSize(self.piece_length));
        }
        Ok(())
    }
}
