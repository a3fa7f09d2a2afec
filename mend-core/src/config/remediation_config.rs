//! Automated remediation configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_EXECUTION_TIMEOUT_MS, MATCHER_CACHE_CAPACITY};

/// Configuration for the remediation subsystem.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RemediationConfig {
    /// Wall-clock budget for a single fix execution, in ms. Default: 30000.
    pub execution_timeout_ms: Option<u64>,
    /// Capacity of the compiled-matcher cache. Default: 1024.
    pub matcher_cache_capacity: Option<u64>,
}

impl RemediationConfig {
    /// Returns the effective execution timeout, defaulting to 30 seconds.
    pub fn effective_execution_timeout_ms(&self) -> u64 {
        self.execution_timeout_ms.unwrap_or(DEFAULT_EXECUTION_TIMEOUT_MS)
    }

    /// Returns the effective matcher cache capacity, defaulting to 1024.
    pub fn effective_matcher_cache_capacity(&self) -> u64 {
        self.matcher_cache_capacity.unwrap_or(MATCHER_CACHE_CAPACITY)
    }
}
