//! Deployment, health, and rollback domain types.

use serde::{Deserialize, Serialize};

use crate::constants::{SENTINEL_ERROR_RATE, SENTINEL_RECENT_ERRORS};

/// Deployment lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentStatus {
    Deployed,
    RolledBack,
    Failed,
}

impl DeploymentStatus {
    /// Stable string form, matching the storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deployed => "deployed",
            Self::RolledBack => "rolled_back",
            Self::Failed => "failed",
        }
    }

    /// Parses a status, defaulting unknown values to `Deployed`.
    pub fn parse_lossy(value: &str) -> DeploymentStatus {
        match value.to_ascii_lowercase().as_str() {
            "rolled_back" => Self::RolledBack,
            "failed" => Self::Failed,
            _ => Self::Deployed,
        }
    }
}

/// A deployment record as supplied by the deployment tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deployment {
    pub id: String,
    pub version: String,
    pub environment: String,
    pub status: DeploymentStatus,
    /// Whether this deployment passed its own post-deploy health check.
    pub health_check_passed: bool,
    pub deployed_at: i64,
    pub rolled_back_at: Option<i64>,
}

/// Point-in-time deployment health reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentHealthSnapshot {
    pub deployment_id: String,
    pub healthy: bool,
    pub error_rate_per_minute: f64,
    /// Errors observed in the trailing five minutes.
    pub recent_errors: u64,
    pub database_connections: u64,
    pub active_queries: u64,
    pub checked_at: i64,
}

impl DeploymentHealthSnapshot {
    /// Fail-safe reading used when the health source cannot be queried.
    ///
    /// The sentinel error rate and error count deliberately breach their
    /// thresholds, so missing health data is never read as health.
    pub fn sentinel(deployment_id: &str, checked_at: i64) -> Self {
        Self {
            deployment_id: deployment_id.to_string(),
            healthy: false,
            error_rate_per_minute: SENTINEL_ERROR_RATE,
            recent_errors: SENTINEL_RECENT_ERRORS,
            database_connections: 0,
            active_queries: 0,
            checked_at,
        }
    }
}

/// What initiated a rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollbackTrigger {
    Automatic,
    Manual,
}

impl RollbackTrigger {
    /// Stable string form, matching the storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Automatic => "automatic",
            Self::Manual => "manual",
        }
    }

    /// Parses a trigger, defaulting unknown values to `Manual`.
    pub fn parse_lossy(value: &str) -> RollbackTrigger {
        match value.to_ascii_lowercase().as_str() {
            "automatic" => Self::Automatic,
            _ => Self::Manual,
        }
    }
}

/// Rollback executor state machine.
///
/// `Pending -> Snapshotting -> Applying -> Success | Failed`. Only the two
/// terminal states may be a rollback event's status once the executor
/// returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollbackStatus {
    Pending,
    Snapshotting,
    Applying,
    Success,
    Failed,
}

impl RollbackStatus {
    /// Stable string form, matching the storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Snapshotting => "snapshotting",
            Self::Applying => "applying",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }

    /// Parses a status. Unknown values read as `Failed`, never as a live
    /// or successful state.
    pub fn parse_lossy(value: &str) -> RollbackStatus {
        match value.to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "snapshotting" => Self::Snapshotting,
            "applying" => Self::Applying,
            "success" => Self::Success,
            _ => Self::Failed,
        }
    }

    /// True for `Success` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }
}

/// Outcome of one executed rollback step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Completed,
    Failed,
}

/// One entry in a rollback event's ordered step log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollbackStep {
    pub name: String,
    pub status: StepStatus,
    pub detail: Option<String>,
    pub at: i64,
}

impl RollbackStep {
    /// A completed step.
    pub fn completed(name: &str, detail: Option<String>, at: i64) -> Self {
        Self {
            name: name.to_string(),
            status: StepStatus::Completed,
            detail,
            at,
        }
    }

    /// A failed step with the failure detail.
    pub fn failed(name: &str, detail: String, at: i64) -> Self {
        Self {
            name: name.to_string(),
            status: StepStatus::Failed,
            detail: Some(detail),
            at,
        }
    }
}

/// An audited rollback, created with the decision to roll back and always
/// finalized to a terminal status before the executor returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollbackEvent {
    pub id: String,
    pub deployment_id: String,
    pub target_deployment_id: Option<String>,
    pub trigger: RollbackTrigger,
    pub reason: String,
    pub status: RollbackStatus,
    /// Ordered log of executed steps; a partial rollback stays diagnosable.
    pub steps: Vec<RollbackStep>,
    pub pre_snapshot_id: Option<String>,
    pub post_snapshot_id: Option<String>,
    pub error: Option<String>,
    /// Present for manual rollbacks; absent means the monitor triggered it.
    pub initiated_by: Option<String>,
    pub initiated_at: i64,
    pub completed_at: Option<i64>,
}

impl RollbackEvent {
    /// True when the rollback reached `Success`.
    pub fn succeeded(&self) -> bool {
        self.status == RollbackStatus::Success
    }
}

/// When a system snapshot was captured relative to its rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotKind {
    PreRollback,
    PostRollback,
}

impl SnapshotKind {
    /// Stable string form, matching the storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PreRollback => "pre_rollback",
            Self::PostRollback => "post_rollback",
        }
    }

    /// Parses a kind, defaulting unknown values to `PreRollback`.
    pub fn parse_lossy(value: &str) -> SnapshotKind {
        match value.to_ascii_lowercase().as_str() {
            "post_rollback" => Self::PostRollback,
            _ => Self::PreRollback,
        }
    }
}

/// A captured system state summary for the rollback audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub id: String,
    pub deployment_id: String,
    pub kind: SnapshotKind,
    /// Store-defined summary payload (pattern counts, recent errors, ...).
    pub summary: serde_json::Value,
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_snapshot_is_unhealthy_with_breaching_rate() {
        let snapshot = DeploymentHealthSnapshot::sentinel("deploy-1", 1_700_000_000);
        assert!(!snapshot.healthy);
        assert_eq!(snapshot.error_rate_per_minute, SENTINEL_ERROR_RATE);
        assert_eq!(snapshot.recent_errors, SENTINEL_RECENT_ERRORS);
    }

    #[test]
    fn unknown_rollback_status_reads_as_failed() {
        assert_eq!(RollbackStatus::parse_lossy("garbled"), RollbackStatus::Failed);
        assert_eq!(
            RollbackStatus::parse_lossy("snapshotting"),
            RollbackStatus::Snapshotting
        );
    }

    #[test]
    fn terminal_statuses() {
        assert!(RollbackStatus::Success.is_terminal());
        assert!(RollbackStatus::Failed.is_terminal());
        assert!(!RollbackStatus::Pending.is_terminal());
        assert!(!RollbackStatus::Applying.is_terminal());
    }
}
