//! Advisory cluster rebuilds over a pattern snapshot.

use std::sync::Arc;

use mend_core::config::ClusteringConfig;
use mend_core::errors::StorageError;
use mend_core::events::types::ClustersRebuiltEvent;
use mend_core::events::{EventDispatcher, MendEventHandler};
use mend_core::store::PatternStore;
use mend_core::types::time::epoch_secs;
use mend_core::types::{ErrorPattern, PatternCluster};

use super::kmeans::{cluster_count, kmeans};

/// Groups recurring patterns for human review.
///
/// Clustering reads one snapshot of the store and writes only the
/// disposable cluster collection, so it is safe to run concurrently with
/// learning. Output is advisory: nothing in the remediation or rollback
/// path consumes it.
pub struct ClusteringEngine {
    store: Arc<dyn PatternStore>,
    events: Arc<EventDispatcher>,
    config: ClusteringConfig,
}

impl ClusteringEngine {
    pub fn new(store: Arc<dyn PatternStore>) -> Self {
        Self {
            store,
            events: Arc::new(EventDispatcher::new()),
            config: ClusteringConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ClusteringConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_events(mut self, events: Arc<EventDispatcher>) -> Self {
        self.events = events;
        self
    }

    /// Rebuilds all clusters from patterns at or above the occurrence
    /// floor. Returns exactly `cluster_count(n)` clusters whose member
    /// counts sum to n; empty clusters are kept.
    pub fn rebuild_clusters(&self) -> Result<Vec<PatternCluster>, StorageError> {
        let patterns = self
            .store
            .list_for_clustering(self.config.effective_min_occurrences())?;
        if patterns.is_empty() {
            self.store.replace_clusters(&[])?;
            return Ok(Vec::new());
        }

        let k = cluster_count(patterns.len());
        let vectors: Vec<Vec<f64>> = patterns.iter().map(feature_vector).collect();
        let result = kmeans(&vectors, k, self.config.effective_max_iterations());

        let now = epoch_secs();
        let mut clusters: Vec<PatternCluster> = (0..k)
            .map(|index| PatternCluster {
                cluster_index: index,
                pattern_ids: Vec::new(),
                size: 0,
                avg_success_rate: 0.0,
                total_occurrences: 0,
                centroid: result.centroids[index].clone(),
                generated_at: now,
            })
            .collect();

        for (pattern, &assigned) in patterns.iter().zip(&result.assignments) {
            let cluster = &mut clusters[assigned];
            cluster.pattern_ids.push(pattern.id.clone());
            cluster.size += 1;
            cluster.total_occurrences += pattern.occurrence_count;
            cluster.avg_success_rate += pattern.success_rate;
        }
        for cluster in &mut clusters {
            if cluster.size > 0 {
                cluster.avg_success_rate /= cluster.size as f64;
            }
        }

        self.store.replace_clusters(&clusters)?;
        tracing::info!(
            pattern_count = patterns.len(),
            cluster_count = clusters.len(),
            "rebuilt advisory clusters"
        );
        self.events.on_clusters_rebuilt(&ClustersRebuiltEvent {
            cluster_count: clusters.len(),
            pattern_count: patterns.len(),
        });
        Ok(clusters)
    }
}

/// {occurrences, success rate, confidence scaled to the same magnitude,
/// severity weight}.
fn feature_vector(pattern: &ErrorPattern) -> Vec<f64> {
    vec![
        pattern.occurrence_count as f64,
        pattern.success_rate,
        pattern.confidence_score * 100.0,
        pattern.severity.cluster_weight(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use mend_core::store::InMemoryPatternStore;
    use mend_core::types::{PatternType, Severity};

    fn seeded_store(count: usize) -> Arc<InMemoryPatternStore> {
        let store = Arc::new(InMemoryPatternStore::new());
        for i in 0..count {
            let pattern = ErrorPattern {
                id: format!("p{i}"),
                pattern_signature: format!("pattern_{i:04}"),
                pattern_type: PatternType::Database,
                error_matcher: "x".to_string(),
                error_source: "database".to_string(),
                severity: Severity::Error,
                occurrence_count: 3 + i as u64,
                success_rate: (i as f64 * 10.0) % 100.0,
                confidence_score: 0.5,
                auto_fix_enabled: false,
                auto_fix_script: None,
                auto_fix_type: None,
                human_approved: false,
                approved_by: None,
                approved_at: None,
                learned_from_incidents: vec![],
                last_seen: 100,
                created_at: 100,
                updated_at: 100,
            };
            store.create(&pattern).unwrap();
        }
        store
    }

    #[test]
    fn no_eligible_patterns_yields_no_clusters() {
        let engine = ClusteringEngine::new(seeded_store(0));
        assert!(engine.rebuild_clusters().unwrap().is_empty());
    }

    #[test]
    fn members_sum_to_the_eligible_pattern_count() {
        let store = seeded_store(9);
        let engine = ClusteringEngine::new(store.clone());
        let clusters = engine.rebuild_clusters().unwrap();

        assert_eq!(clusters.len(), cluster_count(9));
        let total: usize = clusters.iter().map(|c| c.size).sum();
        assert_eq!(total, 9);

        // Also persisted for review queries.
        assert_eq!(store.list_clusters().unwrap().len(), clusters.len());
    }

    #[test]
    fn single_pattern_forms_one_singleton_cluster() {
        let engine = ClusteringEngine::new(seeded_store(1));
        let clusters = engine.rebuild_clusters().unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].size, 1);
        assert_eq!(clusters[0].pattern_ids, vec!["p0".to_string()]);
    }

    #[test]
    fn occurrence_floor_filters_patterns() {
        let store = Arc::new(InMemoryPatternStore::new());
        let mut below = ErrorPattern {
            id: "low".to_string(),
            pattern_signature: "pattern_low".to_string(),
            pattern_type: PatternType::Api,
            error_matcher: "x".to_string(),
            error_source: "api".to_string(),
            severity: Severity::Warning,
            occurrence_count: 1,
            success_rate: 0.0,
            confidence_score: 0.5,
            auto_fix_enabled: false,
            auto_fix_script: None,
            auto_fix_type: None,
            human_approved: false,
            approved_by: None,
            approved_at: None,
            learned_from_incidents: vec![],
            last_seen: 100,
            created_at: 100,
            updated_at: 100,
        };
        store.create(&below).unwrap();
        below.id = "high".to_string();
        below.pattern_signature = "pattern_high".to_string();
        below.occurrence_count = 4;
        store.create(&below).unwrap();

        let clusters = ClusteringEngine::new(store).rebuild_clusters().unwrap();
        let members: Vec<&String> = clusters.iter().flat_map(|c| &c.pattern_ids).collect();
        assert_eq!(members, vec!["high"]);
    }
}
