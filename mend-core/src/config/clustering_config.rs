//! Pattern clustering configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MIN_CLUSTER_OCCURRENCES, KMEANS_MAX_ITERATIONS};

/// Configuration for the advisory clustering subsystem.
///
/// The cluster-count bounds are not configurable: k is always derived
/// from the eligible pattern count.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Minimum occurrences before a pattern enters clustering. Default: 3.
    pub min_occurrences: Option<u64>,
    /// Iteration cap for a single clustering run. Default: 10.
    pub max_iterations: Option<usize>,
}

impl ClusteringConfig {
    /// Returns the effective occurrence floor, defaulting to 3.
    pub fn effective_min_occurrences(&self) -> u64 {
        self.min_occurrences.unwrap_or(DEFAULT_MIN_CLUSTER_OCCURRENCES)
    }

    /// Returns the effective iteration cap, defaulting to 10.
    pub fn effective_max_iterations(&self) -> usize {
        self.max_iterations.unwrap_or(KMEANS_MAX_ITERATIONS)
    }
}
