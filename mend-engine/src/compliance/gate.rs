//! The policy gate in front of every automated action.

use mend_core::constants::{ENTROPY_ERROR_DIVISOR, ENTROPY_WARNING_LEVEL};
use mend_core::types::time::epoch_secs;
use mend_core::types::ComplianceDecision;

use super::profile::{approved_profiles, ActionDescriptor};

/// System state an action is evaluated against.
///
/// Entropy is measured disorder on a zero-to-one scale; both constructors
/// divide their raw reading by [`ENTROPY_ERROR_DIVISOR`].
#[derive(Debug, Clone, Copy)]
pub struct GateContext {
    pub system_entropy: f64,
}

impl GateContext {
    pub fn new(system_entropy: f64) -> Self {
        Self { system_entropy }
    }

    /// Context for the remediation path: the windowed recent-error count
    /// drives entropy.
    pub fn from_recent_errors(recent_error_count: u64) -> Self {
        Self {
            system_entropy: recent_error_count as f64 / ENTROPY_ERROR_DIVISOR,
        }
    }

    /// Context for the rollback path: the deployment error rate drives
    /// entropy.
    pub fn from_error_rate(error_rate_per_minute: f64) -> Self {
        Self {
            system_entropy: error_rate_per_minute / ENTROPY_ERROR_DIVISOR,
        }
    }
}

/// Pure allow/deny check for automated actions.
///
/// Stateless: every invocation re-evaluates the full policy against the
/// context it is handed. A decision is never cached, because system
/// entropy moves between invocations.
pub struct ComplianceGate;

impl ComplianceGate {
    /// Evaluates one action against the fixed policy invariants.
    pub fn evaluate(action: &ActionDescriptor, context: &GateContext) -> ComplianceDecision {
        let mut violations = Vec::new();
        let mut warnings = Vec::new();

        if action.risk_to_life != 0.0 {
            violations.push(format!(
                "risk_to_life is {}; automated execution requires exactly 0",
                action.risk_to_life
            ));
        }

        if action.entropy_increase > 0.0 {
            violations.push(format!(
                "entropy_increase is {}; an automated action must not add disorder",
                action.entropy_increase
            ));
        }

        let matched = approved_profiles()
            .iter()
            .find(|profile| profile.matches(action));
        if matched.is_none() {
            violations.push(format!(
                "no approved profile matches method_type={} structural_ratio={} target_frequency={}Hz",
                action.method_type.as_str(),
                action.structural_ratio,
                action.target_frequency
            ));
        }

        if context.system_entropy > ENTROPY_WARNING_LEVEL {
            warnings.push(format!(
                "system entropy {:.2} exceeds stability level {ENTROPY_WARNING_LEVEL}",
                context.system_entropy
            ));
        }

        let decision = ComplianceDecision {
            allowed: violations.is_empty(),
            matched_profile: matched.map(|profile| profile.name.to_string()),
            violations,
            warnings,
            system_entropy: context.system_entropy,
            evaluated_at: epoch_secs(),
        };
        if !decision.allowed {
            tracing::warn!(
                action = %action.description,
                violations = decision.violations.len(),
                "automated action denied"
            );
        }
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::profile::ActionMethod;

    #[test]
    fn remediation_action_is_allowed_under_calm_entropy() {
        let action = ActionDescriptor::remediation("pattern_abc");
        let decision = ComplianceGate::evaluate(&action, &GateContext::from_recent_errors(5));
        assert!(decision.allowed);
        assert_eq!(decision.matched_profile.as_deref(), Some("auto-remediation"));
        assert!(decision.violations.is_empty());
        assert!(decision.warnings.is_empty());
        assert_eq!(decision.system_entropy, 0.05);
        assert!(decision.denial_reason().is_none());
    }

    #[test]
    fn nonzero_risk_is_denied_unconditionally() {
        let mut action = ActionDescriptor::remediation("pattern_abc");
        action.risk_to_life = 0.5;
        let decision = ComplianceGate::evaluate(&action, &GateContext::from_recent_errors(0));
        assert!(!decision.allowed);
        assert!(decision.violations[0].contains("risk_to_life"));
        assert!(decision.denial_reason().is_some());
    }

    #[test]
    fn positive_entropy_increase_is_denied() {
        let mut action = ActionDescriptor::remediation("pattern_abc");
        action.entropy_increase = 0.05;
        let decision = ComplianceGate::evaluate(&action, &GateContext::from_recent_errors(0));
        assert!(!decision.allowed);
        assert!(decision.violations[0].contains("entropy_increase"));
    }

    #[test]
    fn zero_entropy_increase_is_allowed() {
        let mut action = ActionDescriptor::remediation("pattern_abc");
        action.entropy_increase = 0.0;
        let decision = ComplianceGate::evaluate(&action, &GateContext::from_recent_errors(0));
        assert!(decision.allowed);
    }

    #[test]
    fn unlisted_method_is_denied() {
        let mut action = ActionDescriptor::remediation("pattern_abc");
        action.method_type = ActionMethod::Forced;
        let decision = ComplianceGate::evaluate(&action, &GateContext::from_recent_errors(0));
        assert!(!decision.allowed);
        assert!(decision.matched_profile.is_none());
        assert!(decision.violations[0].contains("forced"));
    }

    #[test]
    fn rollback_action_matches_its_own_profile() {
        let action = ActionDescriptor::rollback("High error rate");
        let decision = ComplianceGate::evaluate(&action, &GateContext::from_error_rate(8.5));
        assert!(decision.allowed);
        assert_eq!(decision.matched_profile.as_deref(), Some("auto-rollback"));
    }

    #[test]
    fn high_entropy_warns_but_does_not_deny_a_healing_action() {
        let action = ActionDescriptor::remediation("pattern_abc");
        let decision = ComplianceGate::evaluate(&action, &GateContext::from_recent_errors(15));
        assert!(decision.allowed);
        assert_eq!(decision.warnings.len(), 1);
        assert!(decision.warnings[0].contains("entropy"));
    }

    #[test]
    fn violations_accumulate() {
        let mut action = ActionDescriptor::rollback("High error rate");
        action.risk_to_life = 1.0;
        action.entropy_increase = 0.2;
        action.method_type = ActionMethod::Experimental;
        let decision = ComplianceGate::evaluate(&action, &GateContext::from_error_rate(999.0));
        assert_eq!(decision.violations.len(), 3);
        let reason = decision.denial_reason().unwrap();
        assert!(reason.contains("; "));
    }

    #[test]
    fn error_rate_context_divides_by_one_hundred() {
        let context = GateContext::from_error_rate(8.5);
        assert!((context.system_entropy - 0.085).abs() < 1e-12);
    }
}
