//! Rollback errors.

use super::error_code::{self, MendErrorCode};
use super::storage_error::StorageError;

/// Errors from the rollback decision and execution path.
#[derive(Debug, thiserror::Error)]
pub enum RollbackError {
    #[error("Deployment not found: {deployment_id}")]
    DeploymentNotFound { deployment_id: String },

    #[error("No valid rollback target")]
    NoValidTarget,

    #[error("Health snapshot unavailable: {message}")]
    HealthUnavailable { message: String },

    #[error("Rollback apply failed: {message}")]
    ApplyFailed { message: String },

    #[error("Rollback apply timed out after {timeout_ms}ms")]
    ApplyTimeout { timeout_ms: u64 },

    #[error("Policy denied: {reason}")]
    PolicyDenied { reason: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl MendErrorCode for RollbackError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DeploymentNotFound { .. } => error_code::DEPLOYMENT_NOT_FOUND,
            Self::NoValidTarget => error_code::NO_ROLLBACK_TARGET,
            Self::HealthUnavailable { .. } => error_code::HEALTH_UNAVAILABLE,
            Self::ApplyFailed { .. } | Self::ApplyTimeout { .. } => error_code::ROLLBACK_FAILED,
            Self::PolicyDenied { .. } => error_code::POLICY_DENIED,
            Self::Storage(err) => err.error_code(),
        }
    }
}
