//! Rollback decision and execution configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DB_CONNECTIONS_THRESHOLD, DEFAULT_ERROR_RATE_THRESHOLD, DEFAULT_HEALTH_TIMEOUT_MS,
    DEFAULT_RECENT_ERRORS_THRESHOLD, DEFAULT_ROLLBACK_HISTORY_LIMIT, DEFAULT_ROLLBACK_TIMEOUT_MS,
};

/// Configuration for the rollback subsystem.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RollbackConfig {
    /// Errors per minute above which rollback triggers. Default: 5.
    pub error_rate_threshold: Option<f64>,
    /// Recent error count above which rollback triggers. Default: 50.
    pub recent_errors_threshold: Option<u64>,
    /// Database connection count above which rollback triggers. Default: 90.
    pub db_connections_threshold: Option<u64>,
    /// Budget for a single health probe, in ms. Default: 5000.
    pub health_timeout_ms: Option<u64>,
    /// Budget for applying the rollback itself, in ms. Default: 60000.
    pub apply_timeout_ms: Option<u64>,
    /// How many past rollback events history queries return. Default: 10.
    pub history_limit: Option<usize>,
}

impl RollbackConfig {
    /// Returns the effective error-rate threshold, defaulting to 5/min.
    pub fn effective_error_rate_threshold(&self) -> f64 {
        self.error_rate_threshold.unwrap_or(DEFAULT_ERROR_RATE_THRESHOLD)
    }

    /// Returns the effective recent-errors threshold, defaulting to 50.
    pub fn effective_recent_errors_threshold(&self) -> u64 {
        self.recent_errors_threshold
            .unwrap_or(DEFAULT_RECENT_ERRORS_THRESHOLD)
    }

    /// Returns the effective connection threshold, defaulting to 90.
    pub fn effective_db_connections_threshold(&self) -> u64 {
        self.db_connections_threshold
            .unwrap_or(DEFAULT_DB_CONNECTIONS_THRESHOLD)
    }

    /// Returns the effective health probe timeout, defaulting to 5 seconds.
    pub fn effective_health_timeout_ms(&self) -> u64 {
        self.health_timeout_ms.unwrap_or(DEFAULT_HEALTH_TIMEOUT_MS)
    }

    /// Returns the effective apply timeout, defaulting to 60 seconds.
    pub fn effective_apply_timeout_ms(&self) -> u64 {
        self.apply_timeout_ms.unwrap_or(DEFAULT_ROLLBACK_TIMEOUT_MS)
    }

    /// Returns the effective history limit, defaulting to 10.
    pub fn effective_history_limit(&self) -> usize {
        self.history_limit.unwrap_or(DEFAULT_ROLLBACK_HISTORY_LIMIT)
    }
}
