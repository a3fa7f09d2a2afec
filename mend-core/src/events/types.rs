//! Event payload types.

use crate::types::{PatternType, RollbackStatus, RollbackTrigger};

// ---- Learning ----

#[derive(Debug, Clone)]
pub struct PatternLearnedEvent {
    pub pattern_id: String,
    pub pattern_signature: String,
    pub pattern_type: PatternType,
    pub occurrence_count: u64,
    /// True when this occurrence minted the pattern.
    pub newly_created: bool,
}

#[derive(Debug, Clone)]
pub struct PatternApprovedEvent {
    pub pattern_id: String,
    pub approved_by: String,
}

// ---- Remediation ----

#[derive(Debug, Clone)]
pub struct FixAppliedEvent {
    pub pattern_id: String,
    pub incident_id: Option<String>,
    pub success: bool,
    pub execution_time_ms: u64,
}

#[derive(Debug, Clone)]
pub struct FixDeniedEvent {
    pub pattern_id: String,
    pub reason: String,
}

// ---- Clustering ----

#[derive(Debug, Clone)]
pub struct ClustersRebuiltEvent {
    pub cluster_count: usize,
    pub pattern_count: usize,
}

// ---- Rollback ----

#[derive(Debug, Clone)]
pub struct HealthEvaluatedEvent {
    pub deployment_id: String,
    pub healthy: bool,
    pub error_rate_per_minute: f64,
    pub should_rollback: bool,
}

#[derive(Debug, Clone)]
pub struct RollbackStartedEvent {
    pub rollback_id: String,
    pub deployment_id: String,
    pub trigger: RollbackTrigger,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct RollbackCompletedEvent {
    pub rollback_id: String,
    pub deployment_id: String,
    pub target_deployment_id: Option<String>,
    pub status: RollbackStatus,
}

// ---- Errors ----

#[derive(Debug, Clone)]
pub struct ErrorEvent {
    /// Subsystem that raised the error.
    pub source: String,
    pub message: String,
}
