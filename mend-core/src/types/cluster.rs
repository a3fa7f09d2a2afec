//! Advisory pattern clusters.

use serde::{Deserialize, Serialize};

/// One k-means cluster of learned patterns.
///
/// Clusters are advisory output for human review, regenerated on every
/// clustering run. No automated decision path reads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternCluster {
    pub cluster_index: usize,
    pub pattern_ids: Vec<String>,
    pub size: usize,
    pub avg_success_rate: f64,
    pub total_occurrences: u64,
    /// Final centroid in feature space: occurrence count, success rate,
    /// confidence x100, severity weight.
    pub centroid: Vec<f64>,
    pub generated_at: i64,
}
