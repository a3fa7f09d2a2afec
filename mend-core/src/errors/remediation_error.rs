//! Fix execution errors.

use super::error_code::{self, MendErrorCode};
use super::storage_error::StorageError;

/// Errors from the fix execution path.
///
/// Policy denials are not represented here: a denied action is an ordinary
/// outcome reported to the caller, not an error.
#[derive(Debug, thiserror::Error)]
pub enum RemediationError {
    #[error("Fix execution failed: {message}")]
    ExecutionFailed { message: String },

    #[error("Fix execution timed out after {timeout_ms}ms")]
    ExecutionTimeout { timeout_ms: u64 },

    #[error("Pattern {pattern_id} is auto-fix enabled without human approval")]
    UnapprovedAutoFix { pattern_id: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl MendErrorCode for RemediationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ExecutionFailed { .. } => error_code::EXECUTION_FAILED,
            Self::ExecutionTimeout { .. } => error_code::EXECUTION_TIMEOUT,
            Self::UnapprovedAutoFix { .. } => error_code::INVARIANT_VIOLATION,
            Self::Storage(err) => err.error_code(),
        }
    }
}
