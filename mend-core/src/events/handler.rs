//! MendEventHandler trait, all methods with no-op defaults.

use super::types::*;

/// Trait for observing pipeline events.
///
/// All methods have no-op default implementations, so handlers only need
/// to override the events they care about. The trait requires `Send + Sync`
/// for use across the pipeline's worker threads.
pub trait MendEventHandler: Send + Sync {
    // ---- Learning ----
    fn on_pattern_learned(&self, _event: &PatternLearnedEvent) {}
    fn on_pattern_approved(&self, _event: &PatternApprovedEvent) {}

    // ---- Remediation ----
    fn on_fix_applied(&self, _event: &FixAppliedEvent) {}
    fn on_fix_denied(&self, _event: &FixDeniedEvent) {}

    // ---- Clustering ----
    fn on_clusters_rebuilt(&self, _event: &ClustersRebuiltEvent) {}

    // ---- Rollback ----
    fn on_health_evaluated(&self, _event: &HealthEvaluatedEvent) {}
    fn on_rollback_started(&self, _event: &RollbackStartedEvent) {}
    fn on_rollback_completed(&self, _event: &RollbackCompletedEvent) {}

    // ---- Errors ----
    fn on_error(&self, _event: &ErrorEvent) {}
}
