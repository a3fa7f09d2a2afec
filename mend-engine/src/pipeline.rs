//! The incident hot path, end to end.

use std::sync::Arc;

use mend_core::config::MendConfig;
use mend_core::errors::{LearnError, StorageError};
use mend_core::events::EventDispatcher;
use mend_core::store::{FixApproval, PatternStore};
use mend_core::types::ErrorPattern;

use crate::learning::{LearnOutcome, LearningEngine};
use crate::remediation::{ApplyOutcome, FixExecutor, RemediationApplier};
use crate::report::ErrorReport;

/// What happened to one telemetry error.
#[derive(Debug, Clone)]
pub struct IncidentOutcome {
    pub learn: LearnOutcome,
    /// `None` when the learned pattern carries no approved fix; the
    /// remediation step never runs for unapproved patterns.
    pub remediation: Option<ApplyOutcome>,
}

/// Ties learning and remediation together for one incident.
///
/// Every report is learned first; remediation runs only when the
/// resulting pattern is auto-fix eligible, and the applier re-validates
/// approval and policy on its own before executing anything.
pub struct IncidentPipeline {
    learning: LearningEngine,
    applier: RemediationApplier,
}

impl IncidentPipeline {
    pub fn new(store: Arc<dyn PatternStore>, executor: Arc<dyn FixExecutor>) -> Self {
        Self {
            learning: LearningEngine::new(Arc::clone(&store)),
            applier: RemediationApplier::new(store, executor),
        }
    }

    pub fn with_config(mut self, config: &MendConfig) -> Self {
        self.learning = self.learning.with_config(config.learning.clone());
        self.applier = self.applier.with_config(config);
        self
    }

    pub fn with_events(mut self, events: Arc<EventDispatcher>) -> Self {
        self.learning = self.learning.with_events(Arc::clone(&events));
        self.applier = self.applier.with_events(events);
        self
    }

    /// Learns from the report, then applies an approved fix if the
    /// pattern carries one.
    pub fn handle_report(&self, report: &ErrorReport) -> Result<IncidentOutcome, LearnError> {
        let learn = self.learning.learn_from_error(report)?;
        let remediation = if learn.pattern.auto_fix_enabled && learn.pattern.human_approved {
            Some(self.applier.find_and_apply(report))
        } else {
            None
        };
        Ok(IncidentOutcome { learn, remediation })
    }

    /// Remediation without the learning step, for callers replaying a
    /// known incident.
    pub fn remediate(&self, report: &ErrorReport) -> ApplyOutcome {
        self.applier.find_and_apply(report)
    }

    pub fn approve_auto_fix(&self, approval: &FixApproval) -> Result<ErrorPattern, StorageError> {
        self.learning.approve_auto_fix(approval)
    }
}
