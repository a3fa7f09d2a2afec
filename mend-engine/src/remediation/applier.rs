//! Lookup, gate, execute, record: the remediation hot path.

use std::sync::Arc;
use std::time::Instant;

use mend_core::config::{MendConfig, RemediationConfig};
use mend_core::constants::DEFAULT_RECENT_ERROR_WINDOW_SECS;
use mend_core::errors::RemediationError;
use mend_core::events::types::{ErrorEvent, FixAppliedEvent, FixDeniedEvent};
use mend_core::events::{EventDispatcher, MendEventHandler};
use mend_core::store::PatternStore;
use mend_core::types::time::epoch_secs;
use mend_core::types::{ApplicationRecord, ComplianceDecision, ErrorPattern, FixType};
use moka::sync::Cache;
use regex::Regex;
use uuid::Uuid;

use crate::compliance::{ActionDescriptor, ComplianceGate, GateContext};
use crate::exec::call_with_timeout;
use crate::learning::matcher::compile_matcher;
use crate::remediation::executor::FixExecutor;
use crate::report::ErrorReport;
use crate::signature::signature_for;

/// Result of one find-and-apply attempt.
///
/// `applied` means a fix script ran; `success` is the separate outcome of
/// that run. A denied or unmatched attempt leaves both execution fields
/// empty and explains itself through `reason`.
#[derive(Debug, Clone)]
pub struct ApplyOutcome {
    pub applied: bool,
    pub success: Option<bool>,
    pub reason: Option<String>,
    pub pattern: Option<ErrorPattern>,
    pub execution_time_ms: Option<u64>,
    pub decision: Option<ComplianceDecision>,
}

impl ApplyOutcome {
    fn not_applied(reason: impl Into<String>) -> Self {
        Self {
            applied: false,
            success: None,
            reason: Some(reason.into()),
            pattern: None,
            execution_time_ms: None,
            decision: None,
        }
    }
}

/// Orchestrates one incident's remediation attempt.
///
/// Every path through [`find_and_apply`](Self::find_and_apply) returns an
/// [`ApplyOutcome`]; store trouble, a denied gate, a failing script, and a
/// hung collaborator all surface as outcomes, never as panics or errors
/// escaping the ingestion path.
pub struct RemediationApplier {
    store: Arc<dyn PatternStore>,
    executor: Arc<dyn FixExecutor>,
    events: Arc<EventDispatcher>,
    config: RemediationConfig,
    window_secs: i64,
    matcher_cache: Cache<String, Option<Regex>>,
}

impl RemediationApplier {
    pub fn new(store: Arc<dyn PatternStore>, executor: Arc<dyn FixExecutor>) -> Self {
        let config = RemediationConfig::default();
        let matcher_cache = Cache::builder()
            .max_capacity(config.effective_matcher_cache_capacity())
            .build();
        Self {
            store,
            executor,
            events: Arc::new(EventDispatcher::new()),
            config,
            window_secs: DEFAULT_RECENT_ERROR_WINDOW_SECS,
            matcher_cache,
        }
    }

    pub fn with_config(mut self, config: &MendConfig) -> Self {
        self.config = config.remediation.clone();
        self.window_secs = config.learning.effective_recent_error_window_secs();
        self.matcher_cache = Cache::builder()
            .max_capacity(self.config.effective_matcher_cache_capacity())
            .build();
        self
    }

    pub fn with_events(mut self, events: Arc<EventDispatcher>) -> Self {
        self.events = events;
        self
    }

    /// Finds the best auto-fix-eligible pattern for the reported error and
    /// applies its fix behind the compliance gate, recording the attempt
    /// either way.
    pub fn find_and_apply(&self, report: &ErrorReport) -> ApplyOutcome {
        self.dispatch(report, |pattern| {
            ActionDescriptor::remediation(&pattern.pattern_signature)
        })
    }

    /// Same flow as [`find_and_apply`](Self::find_and_apply) with a
    /// caller-supplied action descriptor. The gate judges the descriptor
    /// like any other; only whitelisted profiles execute.
    pub fn find_and_apply_with_action(
        &self,
        report: &ErrorReport,
        action: ActionDescriptor,
    ) -> ApplyOutcome {
        self.dispatch(report, move |_| action.clone())
    }

    fn dispatch(
        &self,
        report: &ErrorReport,
        action_for: impl Fn(&ErrorPattern) -> ActionDescriptor,
    ) -> ApplyOutcome {
        match self.try_find_and_apply(report, action_for) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!(error = %err, source = %report.source, "find-and-apply failed");
                self.events.on_error(&ErrorEvent {
                    source: "remediation".to_string(),
                    message: err.to_string(),
                });
                ApplyOutcome::not_applied(err.to_string())
            }
        }
    }

    fn try_find_and_apply(
        &self,
        report: &ErrorReport,
        action_for: impl Fn(&ErrorPattern) -> ActionDescriptor,
    ) -> Result<ApplyOutcome, RemediationError> {
        let signature = signature_for(&report.message, &report.source);
        let Some(pattern) = self.best_candidate(&signature, &report.message)? else {
            return Ok(ApplyOutcome::not_applied("No matching pattern found"));
        };
        let Some((script, fix_type)) = eligible_fix(&pattern) else {
            return Ok(ApplyOutcome::not_applied("No matching pattern found"));
        };

        let recent_errors = self.store.recent_error_count(self.window_secs)?;
        let decision = ComplianceGate::evaluate(
            &action_for(&pattern),
            &GateContext::from_recent_errors(recent_errors),
        );
        if !decision.allowed {
            let reason = match decision.denial_reason() {
                Some(detail) => format!("policy denied: {detail}"),
                None => "policy denied".to_string(),
            };
            self.events.on_fix_denied(&FixDeniedEvent {
                pattern_id: pattern.id.clone(),
                reason: reason.clone(),
            });
            return Ok(ApplyOutcome {
                applied: false,
                success: None,
                reason: Some(reason),
                pattern: Some(pattern),
                execution_time_ms: None,
                decision: Some(decision),
            });
        }

        let timeout_ms = self.config.effective_execution_timeout_ms();
        let executor = Arc::clone(&self.executor);
        let exec_script = script.clone();
        let started = Instant::now();
        let result = call_with_timeout(timeout_ms, move || executor.execute(&exec_script, fix_type));
        let execution_time_ms = started.elapsed().as_millis() as u64;

        let (success, detail) = match result {
            Some(Ok(outcome)) => (outcome.success, outcome.detail),
            Some(Err(err)) => (false, Some(err.to_string())),
            None => (
                false,
                Some(RemediationError::ExecutionTimeout { timeout_ms }.to_string()),
            ),
        };

        let record = ApplicationRecord {
            id: Uuid::new_v4().to_string(),
            pattern_id: pattern.id.clone(),
            incident_id: report.incident_id.clone(),
            success,
            execution_time_ms,
            fix_script: Some(script),
            decision: Some(decision.clone()),
            applied_at: epoch_secs(),
        };
        let updated = self.store.append_application(&record)?;

        tracing::info!(
            pattern_id = %updated.id,
            success,
            fix_execution_time = execution_time_ms,
            confidence = updated.confidence_score,
            "fix applied"
        );
        self.events.on_fix_applied(&FixAppliedEvent {
            pattern_id: updated.id.clone(),
            incident_id: report.incident_id.clone(),
            success,
            execution_time_ms,
        });

        Ok(ApplyOutcome {
            applied: true,
            success: Some(success),
            reason: detail,
            pattern: Some(updated),
            execution_time_ms: Some(execution_time_ms),
            decision: Some(decision),
        })
    }

    /// Exact signature hit first; otherwise the enabled patterns are
    /// scanned with their compiled matchers and ranked by confidence then
    /// success rate.
    fn best_candidate(
        &self,
        signature: &str,
        message: &str,
    ) -> Result<Option<ErrorPattern>, RemediationError> {
        if let Some(pattern) = self.store.find_by_signature(signature)? {
            if pattern.auto_fix_eligible() {
                return Ok(Some(pattern));
            }
        }

        let mut candidates: Vec<ErrorPattern> = self
            .store
            .list_auto_fix_enabled()?
            .into_iter()
            .filter(|pattern| {
                pattern.auto_fix_eligible() && self.matcher_matches(pattern, message)
            })
            .collect();
        candidates.sort_by(|a, b| {
            b.confidence_score
                .total_cmp(&a.confidence_score)
                .then(b.success_rate.total_cmp(&a.success_rate))
        });
        Ok(candidates.into_iter().next())
    }

    fn matcher_matches(&self, pattern: &ErrorPattern, message: &str) -> bool {
        let compiled = self
            .matcher_cache
            .get_with(pattern.error_matcher.clone(), || {
                compile_matcher(&pattern.error_matcher)
            });
        match compiled {
            Some(regex) => regex.is_match(message),
            None => false,
        }
    }
}

fn eligible_fix(pattern: &ErrorPattern) -> Option<(String, FixType)> {
    if !pattern.auto_fix_eligible() {
        return None;
    }
    let script = pattern.auto_fix_script.clone()?;
    Some((script, pattern.auto_fix_type.unwrap_or(FixType::Script)))
}
