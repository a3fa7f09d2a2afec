//! Pattern learning over the store trait.

use std::sync::Arc;

use mend_core::config::LearningConfig;
use mend_core::errors::{LearnError, StorageError};
use mend_core::events::types::{PatternApprovedEvent, PatternLearnedEvent};
use mend_core::events::{EventDispatcher, MendEventHandler};
use mend_core::store::{FixApproval, IncidentRecord, PatternStore};
use mend_core::types::time::epoch_secs;
use mend_core::types::ErrorPattern;
use uuid::Uuid;

use crate::features::{extract_features, ErrorFeatures};
use crate::learning::classifier::classify_pattern_type;
use crate::learning::matcher::synthesize_matcher;
use crate::report::ErrorReport;
use crate::signature::signature_for;

/// Result of learning one telemetry error.
#[derive(Debug, Clone)]
pub struct LearnOutcome {
    pub pattern: ErrorPattern,
    pub newly_created: bool,
    pub features: ErrorFeatures,
}

/// Learns error patterns from telemetry and keeps their occurrence state.
///
/// The signature upsert is delegated to the store, which guarantees
/// at-most-one pattern per signature under concurrent identical arrivals.
/// The engine never holds its own lock.
pub struct LearningEngine {
    store: Arc<dyn PatternStore>,
    events: Arc<EventDispatcher>,
    config: LearningConfig,
}

impl LearningEngine {
    pub fn new(store: Arc<dyn PatternStore>) -> Self {
        Self {
            store,
            events: Arc::new(EventDispatcher::new()),
            config: LearningConfig::default(),
        }
    }

    pub fn with_config(mut self, config: LearningConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_events(mut self, events: Arc<EventDispatcher>) -> Self {
        self.events = events;
        self
    }

    /// Learns from one error: creates the pattern on first occurrence,
    /// advances occurrence state on repeats, and logs the incident for
    /// the recent-error window.
    pub fn learn_from_error(&self, report: &ErrorReport) -> Result<LearnOutcome, LearnError> {
        if report.message.trim().is_empty() {
            return Err(LearnError::EmptyMessage);
        }
        if report.source.trim().is_empty() {
            return Err(LearnError::EmptySource);
        }

        let features = extract_features(&report.message, &report.source);
        let signature = signature_for(&report.message, &report.source);
        let now = epoch_secs();

        let candidate = ErrorPattern {
            id: Uuid::new_v4().to_string(),
            pattern_signature: signature,
            pattern_type: classify_pattern_type(&report.message, &report.source),
            error_matcher: synthesize_matcher(&report.message),
            error_source: report.source.clone(),
            severity: report.severity,
            occurrence_count: 1,
            success_rate: 0.0,
            confidence_score: self.config.effective_initial_confidence(),
            auto_fix_enabled: false,
            auto_fix_script: None,
            auto_fix_type: None,
            human_approved: false,
            approved_by: None,
            approved_at: None,
            learned_from_incidents: report.incident_id.iter().cloned().collect(),
            last_seen: now,
            created_at: now,
            updated_at: now,
        };

        let outcome = self.store.upsert_occurrence(&candidate)?;
        self.store.record_incident(&IncidentRecord {
            incident_id: report.incident_id.clone(),
            error_source: report.source.clone(),
            severity: report.severity,
            seen_at: now,
        })?;

        let newly_created = outcome.newly_created();
        if newly_created {
            tracing::info!(
                signature = %outcome.pattern.pattern_signature,
                pattern_type = outcome.pattern.pattern_type.as_str(),
                source = %report.source,
                "learned new error pattern"
            );
        } else {
            tracing::debug!(
                signature = %outcome.pattern.pattern_signature,
                occurrence_count = outcome.pattern.occurrence_count,
                "repeat occurrence"
            );
        }
        self.events.on_pattern_learned(&PatternLearnedEvent {
            pattern_id: outcome.pattern.id.clone(),
            pattern_signature: outcome.pattern.pattern_signature.clone(),
            pattern_type: outcome.pattern.pattern_type,
            occurrence_count: outcome.pattern.occurrence_count,
            newly_created,
        });

        Ok(LearnOutcome {
            pattern: outcome.pattern,
            newly_created,
            features,
        })
    }

    /// Attaches a human-approved fix to a pattern, making it auto-fix
    /// eligible. The store enforces that the approval pair flips together.
    pub fn approve_auto_fix(&self, approval: &FixApproval) -> Result<ErrorPattern, StorageError> {
        let pattern = self.store.approve_auto_fix(approval)?;
        tracing::info!(
            pattern_id = %pattern.id,
            approved_by = %approval.approved_by,
            fix_type = ?approval.fix_type,
            "auto-fix approved"
        );
        self.events.on_pattern_approved(&PatternApprovedEvent {
            pattern_id: pattern.id.clone(),
            approved_by: approval.approved_by.clone(),
        });
        Ok(pattern)
    }
}
