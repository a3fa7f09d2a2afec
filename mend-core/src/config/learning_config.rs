//! Pattern learning configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_INITIAL_CONFIDENCE, DEFAULT_RECENT_ERROR_WINDOW_SECS};

/// Configuration for the pattern learning subsystem.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LearningConfig {
    /// Confidence assigned to newly learned patterns (0.0-1.0). Default: 0.5.
    pub initial_confidence: Option<f64>,
    /// Window used by the recent-error counter, in seconds. Default: 300.
    pub recent_error_window_secs: Option<i64>,
}

impl LearningConfig {
    /// Returns the effective initial confidence, defaulting to 0.5.
    pub fn effective_initial_confidence(&self) -> f64 {
        self.initial_confidence.unwrap_or(DEFAULT_INITIAL_CONFIDENCE)
    }

    /// Returns the effective recent-error window, defaulting to 5 minutes.
    pub fn effective_recent_error_window_secs(&self) -> i64 {
        self.recent_error_window_secs
            .unwrap_or(DEFAULT_RECENT_ERROR_WINDOW_SECS)
    }
}
