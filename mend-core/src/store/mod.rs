//! Persistence contracts for the self-healing pipeline.
//!
//! The engine talks to keyed stores through these traits. `mend-storage`
//! provides the durable SQLite implementations; [`memory`] provides
//! mutex-guarded in-memory implementations for tests and single-run usage.

pub mod memory;

use crate::errors::StorageError;
use crate::types::{
    ApplicationRecord, Deployment, ErrorPattern, FixType, PatternCluster, PatternStatistics,
    RollbackEvent, Severity, SnapshotKind, SystemSnapshot,
};

pub use memory::{InMemoryDeploymentStore, InMemoryPatternStore};

/// How an upsert resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertDisposition {
    /// No pattern existed for the signature; the candidate was inserted.
    Created,
    /// A pattern existed; its occurrence state was advanced.
    Updated,
}

/// Result of the atomic learn-path upsert.
#[derive(Debug, Clone)]
pub struct UpsertOutcome {
    pub pattern: ErrorPattern,
    pub disposition: UpsertDisposition,
}

impl UpsertOutcome {
    /// True when the upsert inserted a new pattern.
    pub fn newly_created(&self) -> bool {
        self.disposition == UpsertDisposition::Created
    }
}

/// Mutable subset of a pattern accepted by [`PatternStore::update`].
///
/// Derived fields are deliberately absent: occurrences move through
/// `upsert_occurrence`, success_rate and confidence through
/// `append_application`, and the approval pair through `approve_auto_fix`.
#[derive(Debug, Clone, Default)]
pub struct PatternDelta {
    pub pattern_id: String,
    pub severity: Option<Severity>,
    pub error_matcher: Option<String>,
    /// Enabling requires the pattern to already be human-approved;
    /// disabling is always allowed.
    pub auto_fix_enabled: Option<bool>,
}

/// Human approval attaching a fix to a pattern.
#[derive(Debug, Clone)]
pub struct FixApproval {
    pub pattern_id: String,
    pub fix_script: String,
    pub fix_type: FixType,
    pub approved_by: String,
}

/// One telemetry arrival, logged for windowed error counting.
#[derive(Debug, Clone)]
pub struct IncidentRecord {
    pub incident_id: Option<String>,
    pub error_source: String,
    pub severity: Severity,
    pub seen_at: i64,
}

/// Keyed persistence for learned patterns and their application history.
///
/// Implementations must guarantee at-most-one pattern per signature under
/// concurrent identical arrivals (unique constraint plus an atomic upsert,
/// not caller-side locking), and must derive success_rate and
/// confidence_score exclusively inside `append_application`.
pub trait PatternStore: Send + Sync {
    /// Looks up a pattern by its deterministic signature.
    fn find_by_signature(&self, signature: &str) -> Result<Option<ErrorPattern>, StorageError>;

    /// Inserts a new pattern. Fails with `DuplicateSignature` when the
    /// signature already exists.
    fn create(&self, pattern: &ErrorPattern) -> Result<(), StorageError>;

    /// Applies a partial update. Enabling auto-fix on a pattern that is
    /// not human-approved is rejected with `InvariantViolation`.
    fn update(&self, delta: &PatternDelta) -> Result<ErrorPattern, StorageError>;

    /// Atomic learn path: insert `candidate`, or if its signature exists,
    /// increment occurrence_count, dedup-append the candidate's incident
    /// ids, and refresh last_seen on the existing row.
    fn upsert_occurrence(&self, candidate: &ErrorPattern) -> Result<UpsertOutcome, StorageError>;

    /// Attaches a human-approved fix, setting human_approved and
    /// auto_fix_enabled together. Rejects an empty script.
    fn approve_auto_fix(&self, approval: &FixApproval) -> Result<ErrorPattern, StorageError>;

    /// Appends an application record and re-derives the pattern's
    /// success_rate and confidence_score from the full history. Returns
    /// the updated pattern.
    fn append_application(&self, record: &ApplicationRecord) -> Result<ErrorPattern, StorageError>;

    /// Application history for one pattern, oldest first.
    fn applications_for(&self, pattern_id: &str)
        -> Result<Vec<ApplicationRecord>, StorageError>;

    /// Patterns eligible for clustering, ordered by occurrence_count
    /// descending with a stable tie-break (clustering seeds come from this
    /// order).
    fn list_for_clustering(&self, min_occurrences: u64)
        -> Result<Vec<ErrorPattern>, StorageError>;

    /// Patterns with auto-fix currently enabled.
    fn list_auto_fix_enabled(&self) -> Result<Vec<ErrorPattern>, StorageError>;

    /// Logs one telemetry arrival.
    fn record_incident(&self, incident: &IncidentRecord) -> Result<(), StorageError>;

    /// Number of incidents seen in the trailing window.
    fn recent_error_count(&self, window_secs: i64) -> Result<u64, StorageError>;

    /// Replaces the advisory cluster set with a freshly generated one.
    fn replace_clusters(&self, clusters: &[PatternCluster]) -> Result<(), StorageError>;

    /// Current advisory cluster set.
    fn list_clusters(&self) -> Result<Vec<PatternCluster>, StorageError>;

    /// Aggregate statistics for dashboards.
    fn statistics(&self) -> Result<PatternStatistics, StorageError>;
}

/// Persistence for deployments, rollback events, and system snapshots.
pub trait DeploymentStore: Send + Sync {
    /// Records or replaces a deployment.
    fn record_deployment(&self, deployment: &Deployment) -> Result<(), StorageError>;

    /// Looks up a deployment by id.
    fn deployment(&self, deployment_id: &str) -> Result<Option<Deployment>, StorageError>;

    /// Most recent deployment in the same environment, older than
    /// `current`, that passed its own health check. Never falls back to an
    /// unverified deployment.
    fn rollback_target(&self, current: &Deployment) -> Result<Option<Deployment>, StorageError>;

    /// Persists a new rollback event.
    fn create_rollback_event(&self, event: &RollbackEvent) -> Result<(), StorageError>;

    /// Replaces a persisted rollback event (status transitions, step log).
    fn update_rollback_event(&self, event: &RollbackEvent) -> Result<(), StorageError>;

    /// Most recent rollback events, newest first.
    fn recent_rollbacks(&self, limit: usize) -> Result<Vec<RollbackEvent>, StorageError>;

    /// Captures a system snapshot for the audit trail and returns it.
    fn create_snapshot(
        &self,
        deployment_id: &str,
        kind: SnapshotKind,
    ) -> Result<SystemSnapshot, StorageError>;

    /// Marks a deployment rolled back and stamps rolled_back_at.
    fn mark_rolled_back(&self, deployment_id: &str, at: i64) -> Result<(), StorageError>;
}
