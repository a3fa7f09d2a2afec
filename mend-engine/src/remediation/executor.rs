//! Fix execution boundary.

use mend_core::errors::RemediationError;
use mend_core::types::FixType;

/// Outcome reported by the execution collaborator.
#[derive(Debug, Clone)]
pub struct FixOutcome {
    pub success: bool,
    /// Collaborator-supplied detail, usually present on failure.
    pub detail: Option<String>,
}

impl FixOutcome {
    /// A successful run.
    pub fn succeeded() -> Self {
        Self {
            success: true,
            detail: None,
        }
    }

    /// A failed run with the collaborator's detail.
    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            success: false,
            detail: Some(detail.into()),
        }
    }
}

/// Executes approved fix scripts.
///
/// Implementations live outside this crate (a shell runner, an SQL
/// channel, an HTTP side-channel); the applier only sees success and
/// duration. An `Err`, a panic, or a timeout are all recorded as a failed
/// application, never propagated out of the remediation path.
pub trait FixExecutor: Send + Sync {
    fn execute(&self, script: &str, fix_type: FixType) -> Result<FixOutcome, RemediationError>;
}
