//! TOML configuration for draws and simulations.
//!
//! Every section and field has a default, so an empty file is valid:
//!
//! ```toml
//! [draw]
//! seed = 42              # omit for an entropy seed
//! max_entries = 100      # omit to keep everyone
//! strategy = "cumulative"
//! label_field = "name"
//! output_format = "json"
//!
//! [simulation]
//! trials = 10000
//! parallel = true
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use trendify_core::ShuffleStrategy;

use crate::export::OutputFormat;

/// Errors reading or validating a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendifyConfig {
    pub draw: DrawSettings,
    pub simulation: SimulationSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawSettings {
    /// Fixed seed for reproducible draws. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Trim the drawn list to this many entries.
    pub max_entries: Option<usize>,
    pub strategy: ShuffleStrategy,
    /// Field shown as the entry's label in CSV output and summaries.
    pub label_field: String,
    pub output_format: OutputFormat,
}

impl Default for DrawSettings {
    fn default() -> Self {
        Self {
            seed: None,
            max_entries: None,
            strategy: ShuffleStrategy::Cumulative,
            label_field: "name".into(),
            output_format: OutputFormat::Json,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub trials: usize,
    pub parallel: bool,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            trials: 10_000,
            parallel: true,
        }
    }
}

impl TrendifyConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.draw.label_field.trim().is_empty() {
            return Err(ConfigError::Invalid("draw.label_field must not be empty".into()));
        }
        if self.simulation.trials == 0 {
            return Err(ConfigError::Invalid("simulation.trials must be at least 1".into()));
        }
        Ok(())
    }
}
