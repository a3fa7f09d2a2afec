//! Compliance gate decision snapshot.

use serde::{Deserialize, Serialize};

/// Outcome of one compliance gate evaluation.
///
/// Recorded verbatim on application records and rollback audit steps, so
/// the decision that allowed or blocked an action outlives the action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceDecision {
    pub allowed: bool,
    /// Name of the approved profile the action matched, if any.
    pub matched_profile: Option<String>,
    pub violations: Vec<String>,
    pub warnings: Vec<String>,
    /// System entropy at evaluation time (recent errors / 100).
    pub system_entropy: f64,
    pub evaluated_at: i64,
}

impl ComplianceDecision {
    /// Single-line denial reason, or None when allowed.
    pub fn denial_reason(&self) -> Option<String> {
        if self.allowed {
            None
        } else {
            Some(self.violations.join("; "))
        }
    }
}
