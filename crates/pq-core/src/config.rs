//! # Configuration
//!
//! YAML configuration for the [`crate::analyzer::PowerQualityAnalyzer`].
//!
//! ## Example Configuration
//!
//! ```yaml
//! sample_rate: 10000.0
//! supply_frequency: 60
//! include_spectrum: false
//! rated_value: 35.0
//!
//! logging:
//!   level: debug
//!   format: compact
//! ```
//!
//! Every field is optional. An unsupported `supply_frequency` is rejected
//! while parsing.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::observe::LogConfig;
use crate::supply::SupplyFrequency;

/// Error type for configuration operations.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Failed to read or write the configuration file
    Io(String),
    /// Failed to parse configuration
    Parse(String),
    /// Invalid configuration value
    Validation(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "failed to access config: {}", msg),
            ConfigError::Parse(msg) => write!(f, "failed to parse config: {}", msg),
            ConfigError::Validation(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Analyzer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Sample rate of the waveform in Hz
    pub sample_rate: f64,
    /// Nominal supply frequency (50 or 60)
    pub supply_frequency: SupplyFrequency,
    /// Keep the full spectrum in the report
    pub include_spectrum: bool,
    /// Rated current or voltage for the demand distortion, in subgroup units
    pub rated_value: Option<f64>,
    pub logging: LogConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            sample_rate: 10_000.0,
            supply_frequency: SupplyFrequency::Hz60,
            include_spectrum: false,
            rated_value: None,
            logging: LogConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;

        Self::parse(&content)
    }

    /// Parse and validate configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(ConfigError::Validation(
                "sample_rate must be positive".to_string(),
            ));
        }

        if let Some(rated) = self.rated_value {
            if !(rated.is_finite() && rated > 0.0) {
                return Err(ConfigError::Validation(
                    "rated_value must be positive".to_string(),
                ));
            }
        }

        Ok(())
    }
}
