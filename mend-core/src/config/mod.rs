//! Configuration types for the mend pipeline.
//!
//! All sections deserialize from a single TOML file. Every field is
//! optional; `effective_*()` accessors fall back to the defaults in
//! [`crate::constants`].

mod clustering_config;
mod learning_config;
mod remediation_config;
mod rollback_config;

pub use clustering_config::ClusteringConfig;
pub use learning_config::LearningConfig;
pub use remediation_config::RemediationConfig;
pub use rollback_config::RollbackConfig;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Top-level configuration, one section per subsystem.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MendConfig {
    pub learning: LearningConfig,
    pub clustering: ClusteringConfig,
    pub remediation: RemediationConfig,
    pub rollback: RollbackConfig,
}

impl MendConfig {
    /// Loads and validates configuration from a TOML file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        let config: Self = toml::from_str(&raw).map_err(|err| ConfigError::ParseError {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`Self::load_from_path`], but a missing file yields defaults.
    /// Parse and validation failures still error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if !path.as_ref().exists() {
            return Ok(Self::default());
        }
        Self::load_from_path(path)
    }

    /// Rejects values outside their documented ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(confidence) = self.learning.initial_confidence {
            if !(0.0..=1.0).contains(&confidence) {
                return Err(ConfigError::ValidationFailed {
                    field: "learning.initial_confidence".to_string(),
                    message: format!("must be within 0.0-1.0, got {confidence}"),
                });
            }
        }
        if let Some(window) = self.learning.recent_error_window_secs {
            if window <= 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "learning.recent_error_window_secs".to_string(),
                    message: format!("must be positive, got {window}"),
                });
            }
        }
        if let Some(min) = self.clustering.min_occurrences {
            if min == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "clustering.min_occurrences".to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
        }
        if let Some(iterations) = self.clustering.max_iterations {
            if iterations == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "clustering.max_iterations".to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
        }
        if let Some(rate) = self.rollback.error_rate_threshold {
            if rate <= 0.0 {
                return Err(ConfigError::ValidationFailed {
                    field: "rollback.error_rate_threshold".to_string(),
                    message: format!("must be positive, got {rate}"),
                });
            }
        }
        Ok(())
    }
}
