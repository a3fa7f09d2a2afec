//! In-memory store implementations for tests and single-run usage.
//!
//! A single mutex guards each store's state, so the lookup-then-write
//! sequences inside one call are atomic with respect to other callers.

use std::sync::{Mutex, MutexGuard};

use crate::errors::StorageError;
use crate::types::confidence;
use crate::types::time::epoch_secs;
use crate::types::{
    ApplicationRecord, Deployment, DeploymentStatus, ErrorPattern, FxHashMap, FxHashSet,
    PatternCluster, PatternStatistics, RollbackEvent, SnapshotKind, SystemSnapshot,
};

use super::{
    DeploymentStore, FixApproval, IncidentRecord, PatternDelta, PatternStore, UpsertDisposition,
    UpsertOutcome,
};

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn poisoned() -> StorageError {
    StorageError::InvariantViolation {
        message: "in-memory store lock poisoned".to_string(),
    }
}

#[derive(Debug, Default)]
struct PatternState {
    /// Keyed by pattern_signature, the sole dedup key.
    patterns: FxHashMap<String, ErrorPattern>,
    applications: Vec<ApplicationRecord>,
    incidents: Vec<IncidentRecord>,
    clusters: Vec<PatternCluster>,
}

/// In-memory [`PatternStore`].
#[derive(Debug, Default)]
pub struct InMemoryPatternStore {
    state: Mutex<PatternState>,
}

impl InMemoryPatternStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, PatternState>, StorageError> {
        self.state.lock().map_err(|_| poisoned())
    }
}

impl PatternStore for InMemoryPatternStore {
    fn find_by_signature(&self, signature: &str) -> Result<Option<ErrorPattern>, StorageError> {
        let state = self.state()?;
        Ok(state.patterns.get(signature).cloned())
    }

    fn create(&self, pattern: &ErrorPattern) -> Result<(), StorageError> {
        if !pattern.invariants_hold() {
            return Err(StorageError::InvariantViolation {
                message: format!("pattern {} violates invariants", pattern.id),
            });
        }
        let mut state = self.state()?;
        if state.patterns.contains_key(&pattern.pattern_signature) {
            return Err(StorageError::DuplicateSignature {
                signature: pattern.pattern_signature.clone(),
            });
        }
        state
            .patterns
            .insert(pattern.pattern_signature.clone(), pattern.clone());
        Ok(())
    }

    fn update(&self, delta: &PatternDelta) -> Result<ErrorPattern, StorageError> {
        let mut state = self.state()?;
        let pattern = state
            .patterns
            .values_mut()
            .find(|p| p.id == delta.pattern_id)
            .ok_or_else(|| StorageError::NotFound {
                entity: "pattern",
                id: delta.pattern_id.clone(),
            })?;
        if delta.auto_fix_enabled == Some(true) && !pattern.human_approved {
            return Err(StorageError::InvariantViolation {
                message: format!(
                    "cannot enable auto-fix without human approval: {}",
                    delta.pattern_id
                ),
            });
        }
        if let Some(severity) = delta.severity {
            pattern.severity = severity;
        }
        if let Some(matcher) = &delta.error_matcher {
            pattern.error_matcher = matcher.clone();
        }
        if let Some(enabled) = delta.auto_fix_enabled {
            pattern.auto_fix_enabled = enabled;
        }
        pattern.updated_at = epoch_secs();
        Ok(pattern.clone())
    }

    fn upsert_occurrence(&self, candidate: &ErrorPattern) -> Result<UpsertOutcome, StorageError> {
        let mut state = self.state()?;
        if let Some(existing) = state.patterns.get_mut(&candidate.pattern_signature) {
            existing.occurrence_count += 1;
            for incident_id in &candidate.learned_from_incidents {
                if !existing.learned_from_incidents.contains(incident_id) {
                    existing.learned_from_incidents.push(incident_id.clone());
                }
            }
            existing.last_seen = candidate.last_seen;
            existing.updated_at = candidate.last_seen;
            return Ok(UpsertOutcome {
                pattern: existing.clone(),
                disposition: UpsertDisposition::Updated,
            });
        }
        if !candidate.invariants_hold() {
            return Err(StorageError::InvariantViolation {
                message: format!("pattern {} violates invariants", candidate.id),
            });
        }
        state
            .patterns
            .insert(candidate.pattern_signature.clone(), candidate.clone());
        Ok(UpsertOutcome {
            pattern: candidate.clone(),
            disposition: UpsertDisposition::Created,
        })
    }

    fn approve_auto_fix(&self, approval: &FixApproval) -> Result<ErrorPattern, StorageError> {
        if approval.fix_script.trim().is_empty() {
            return Err(StorageError::InvariantViolation {
                message: "approval requires a non-empty fix script".to_string(),
            });
        }
        let mut state = self.state()?;
        let pattern = state
            .patterns
            .values_mut()
            .find(|p| p.id == approval.pattern_id)
            .ok_or_else(|| StorageError::NotFound {
                entity: "pattern",
                id: approval.pattern_id.clone(),
            })?;
        let now = epoch_secs();
        pattern.auto_fix_script = Some(approval.fix_script.clone());
        pattern.auto_fix_type = Some(approval.fix_type);
        pattern.human_approved = true;
        pattern.auto_fix_enabled = true;
        pattern.approved_by = Some(approval.approved_by.clone());
        pattern.approved_at = Some(now);
        pattern.updated_at = now;
        Ok(pattern.clone())
    }

    fn append_application(&self, record: &ApplicationRecord) -> Result<ErrorPattern, StorageError> {
        let mut state = self.state()?;
        if !state.patterns.values().any(|p| p.id == record.pattern_id) {
            return Err(StorageError::NotFound {
                entity: "pattern",
                id: record.pattern_id.clone(),
            });
        }
        state.applications.push(record.clone());
        let outcomes: Vec<bool> = state
            .applications
            .iter()
            .filter(|r| r.pattern_id == record.pattern_id)
            .map(|r| r.success)
            .collect();
        let successes = outcomes.iter().filter(|success| **success).count() as u64;
        let streak_before = confidence::trailing_successes(&outcomes[..outcomes.len() - 1]);
        let pattern = state
            .patterns
            .values_mut()
            .find(|p| p.id == record.pattern_id)
            .ok_or_else(|| StorageError::NotFound {
                entity: "pattern",
                id: record.pattern_id.clone(),
            })?;
        pattern.success_rate = confidence::success_rate(successes, outcomes.len() as u64);
        pattern.confidence_score =
            confidence::adjust_confidence(pattern.confidence_score, record.success, streak_before);
        pattern.updated_at = record.applied_at;
        Ok(pattern.clone())
    }

    fn applications_for(
        &self,
        pattern_id: &str,
    ) -> Result<Vec<ApplicationRecord>, StorageError> {
        let state = self.state()?;
        Ok(state
            .applications
            .iter()
            .filter(|r| r.pattern_id == pattern_id)
            .cloned()
            .collect())
    }

    fn list_for_clustering(
        &self,
        min_occurrences: u64,
    ) -> Result<Vec<ErrorPattern>, StorageError> {
        let state = self.state()?;
        let mut patterns: Vec<ErrorPattern> = state
            .patterns
            .values()
            .filter(|p| p.occurrence_count >= min_occurrences)
            .cloned()
            .collect();
        patterns.sort_by(|a, b| {
            b.occurrence_count
                .cmp(&a.occurrence_count)
                .then_with(|| a.pattern_signature.cmp(&b.pattern_signature))
        });
        Ok(patterns)
    }

    fn list_auto_fix_enabled(&self) -> Result<Vec<ErrorPattern>, StorageError> {
        let state = self.state()?;
        let mut patterns: Vec<ErrorPattern> = state
            .patterns
            .values()
            .filter(|p| p.auto_fix_enabled)
            .cloned()
            .collect();
        patterns.sort_by(|a, b| a.pattern_signature.cmp(&b.pattern_signature));
        Ok(patterns)
    }

    fn record_incident(&self, incident: &IncidentRecord) -> Result<(), StorageError> {
        let mut state = self.state()?;
        state.incidents.push(incident.clone());
        Ok(())
    }

    fn recent_error_count(&self, window_secs: i64) -> Result<u64, StorageError> {
        let state = self.state()?;
        let cutoff = epoch_secs() - window_secs;
        Ok(state
            .incidents
            .iter()
            .filter(|incident| incident.seen_at >= cutoff)
            .count() as u64)
    }

    fn replace_clusters(&self, clusters: &[PatternCluster]) -> Result<(), StorageError> {
        let mut state = self.state()?;
        state.clusters = clusters.to_vec();
        Ok(())
    }

    fn list_clusters(&self) -> Result<Vec<PatternCluster>, StorageError> {
        let state = self.state()?;
        Ok(state.clusters.clone())
    }

    fn statistics(&self) -> Result<PatternStatistics, StorageError> {
        let state = self.state()?;
        let mut stats = PatternStatistics::empty();
        stats.total_patterns = state.patterns.len() as u64;
        stats.auto_fix_enabled = state
            .patterns
            .values()
            .filter(|p| p.auto_fix_enabled)
            .count() as u64;
        stats.human_approved = state
            .patterns
            .values()
            .filter(|p| p.human_approved)
            .count() as u64;
        stats.total_applications = state.applications.len() as u64;
        let applied_ids: FxHashSet<&str> = state
            .applications
            .iter()
            .map(|r| r.pattern_id.as_str())
            .collect();
        let rates: Vec<f64> = state
            .patterns
            .values()
            .filter(|p| applied_ids.contains(p.id.as_str()))
            .map(|p| p.success_rate)
            .collect();
        if !rates.is_empty() {
            stats.avg_success_rate = round2(rates.iter().sum::<f64>() / rates.len() as f64);
        }
        for pattern in state.patterns.values() {
            *stats
                .patterns_by_type
                .entry(pattern.pattern_type.as_str().to_string())
                .or_insert(0) += 1;
        }
        Ok(stats)
    }
}

#[derive(Debug, Default)]
struct DeploymentState {
    deployments: FxHashMap<String, Deployment>,
    events: Vec<RollbackEvent>,
    snapshots: Vec<SystemSnapshot>,
}

/// In-memory [`DeploymentStore`].
#[derive(Debug, Default)]
pub struct InMemoryDeploymentStore {
    state: Mutex<DeploymentState>,
}

impl InMemoryDeploymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, DeploymentState>, StorageError> {
        self.state.lock().map_err(|_| poisoned())
    }
}

impl DeploymentStore for InMemoryDeploymentStore {
    fn record_deployment(&self, deployment: &Deployment) -> Result<(), StorageError> {
        let mut state = self.state()?;
        state
            .deployments
            .insert(deployment.id.clone(), deployment.clone());
        Ok(())
    }

    fn deployment(&self, deployment_id: &str) -> Result<Option<Deployment>, StorageError> {
        let state = self.state()?;
        Ok(state.deployments.get(deployment_id).cloned())
    }

    fn rollback_target(&self, current: &Deployment) -> Result<Option<Deployment>, StorageError> {
        let state = self.state()?;
        Ok(state
            .deployments
            .values()
            .filter(|d| {
                d.id != current.id
                    && d.environment == current.environment
                    && d.deployed_at < current.deployed_at
                    && d.health_check_passed
            })
            .max_by_key(|d| d.deployed_at)
            .cloned())
    }

    fn create_rollback_event(&self, event: &RollbackEvent) -> Result<(), StorageError> {
        let mut state = self.state()?;
        state.events.push(event.clone());
        Ok(())
    }

    fn update_rollback_event(&self, event: &RollbackEvent) -> Result<(), StorageError> {
        let mut state = self.state()?;
        let existing = state
            .events
            .iter_mut()
            .find(|e| e.id == event.id)
            .ok_or_else(|| StorageError::NotFound {
                entity: "rollback event",
                id: event.id.clone(),
            })?;
        *existing = event.clone();
        Ok(())
    }

    fn recent_rollbacks(&self, limit: usize) -> Result<Vec<RollbackEvent>, StorageError> {
        let state = self.state()?;
        let mut events = state.events.clone();
        // Reverse first so the stable sort keeps later inserts ahead of
        // earlier ones within the same second.
        events.reverse();
        events.sort_by(|a, b| b.initiated_at.cmp(&a.initiated_at));
        events.truncate(limit);
        Ok(events)
    }

    fn create_snapshot(
        &self,
        deployment_id: &str,
        kind: SnapshotKind,
    ) -> Result<SystemSnapshot, StorageError> {
        let mut state = self.state()?;
        let snapshot = SystemSnapshot {
            id: uuid::Uuid::new_v4().to_string(),
            deployment_id: deployment_id.to_string(),
            kind,
            summary: serde_json::json!({
                "deployments": state.deployments.len(),
                "rollback_events": state.events.len(),
            }),
            created_at: epoch_secs(),
        };
        state.snapshots.push(snapshot.clone());
        Ok(snapshot)
    }

    fn mark_rolled_back(&self, deployment_id: &str, at: i64) -> Result<(), StorageError> {
        let mut state = self.state()?;
        let deployment = state
            .deployments
            .get_mut(deployment_id)
            .ok_or_else(|| StorageError::NotFound {
                entity: "deployment",
                id: deployment_id.to_string(),
            })?;
        deployment.status = DeploymentStatus::RolledBack;
        deployment.rolled_back_at = Some(at);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_INITIAL_CONFIDENCE;
    use crate::types::{FixType, PatternType, RollbackStatus, RollbackTrigger, Severity};

    fn make_pattern(signature: &str, occurrences: u64) -> ErrorPattern {
        ErrorPattern {
            id: format!("id-{signature}"),
            pattern_signature: signature.to_string(),
            pattern_type: PatternType::Database,
            error_matcher: "connection refused".to_string(),
            error_source: "database".to_string(),
            severity: Severity::Error,
            occurrence_count: occurrences,
            success_rate: 0.0,
            confidence_score: DEFAULT_INITIAL_CONFIDENCE,
            auto_fix_enabled: false,
            auto_fix_script: None,
            auto_fix_type: None,
            human_approved: false,
            approved_by: None,
            approved_at: None,
            learned_from_incidents: vec![format!("inc-{signature}")],
            last_seen: 100,
            created_at: 100,
            updated_at: 100,
        }
    }

    fn make_record(pattern_id: &str, success: bool) -> ApplicationRecord {
        ApplicationRecord {
            id: uuid::Uuid::new_v4().to_string(),
            pattern_id: pattern_id.to_string(),
            incident_id: None,
            success,
            execution_time_ms: 12,
            fix_script: Some("SELECT 1;".to_string()),
            decision: None,
            applied_at: 200,
        }
    }

    fn make_deployment(id: &str, deployed_at: i64, healthy: bool) -> Deployment {
        Deployment {
            id: id.to_string(),
            version: format!("v-{id}"),
            environment: "production".to_string(),
            status: DeploymentStatus::Deployed,
            health_check_passed: healthy,
            deployed_at,
            rolled_back_at: None,
        }
    }

    #[test]
    fn upsert_creates_then_updates() {
        let store = InMemoryPatternStore::new();
        let first = store.upsert_occurrence(&make_pattern("pattern_a", 1)).unwrap();
        assert!(first.newly_created());

        let mut repeat = make_pattern("pattern_a", 1);
        repeat.learned_from_incidents = vec!["inc-2".to_string()];
        repeat.last_seen = 150;
        let second = store.upsert_occurrence(&repeat).unwrap();
        assert!(!second.newly_created());
        assert_eq!(second.pattern.occurrence_count, 2);
        assert_eq!(second.pattern.last_seen, 150);
        assert_eq!(
            second.pattern.learned_from_incidents,
            vec!["inc-pattern_a".to_string(), "inc-2".to_string()]
        );
    }

    #[test]
    fn upsert_dedups_incident_ids() {
        let store = InMemoryPatternStore::new();
        store.upsert_occurrence(&make_pattern("pattern_a", 1)).unwrap();
        let outcome = store.upsert_occurrence(&make_pattern("pattern_a", 1)).unwrap();
        assert_eq!(outcome.pattern.learned_from_incidents.len(), 1);
    }

    #[test]
    fn create_rejects_duplicate_signature() {
        let store = InMemoryPatternStore::new();
        store.create(&make_pattern("pattern_a", 1)).unwrap();
        let err = store.create(&make_pattern("pattern_a", 1)).unwrap_err();
        assert!(matches!(err, StorageError::DuplicateSignature { .. }));
    }

    #[test]
    fn update_rejects_enabling_unapproved_pattern() {
        let store = InMemoryPatternStore::new();
        let pattern = make_pattern("pattern_a", 1);
        store.create(&pattern).unwrap();
        let err = store
            .update(&PatternDelta {
                pattern_id: pattern.id.clone(),
                auto_fix_enabled: Some(true),
                ..PatternDelta::default()
            })
            .unwrap_err();
        assert!(matches!(err, StorageError::InvariantViolation { .. }));
    }

    #[test]
    fn approval_sets_both_flags_together() {
        let store = InMemoryPatternStore::new();
        let pattern = make_pattern("pattern_a", 3);
        store.create(&pattern).unwrap();
        let approved = store
            .approve_auto_fix(&FixApproval {
                pattern_id: pattern.id.clone(),
                fix_script: "VACUUM;".to_string(),
                fix_type: FixType::Sql,
                approved_by: "ops@example.com".to_string(),
            })
            .unwrap();
        assert!(approved.auto_fix_enabled);
        assert!(approved.human_approved);
        assert!(approved.invariants_hold());
        assert_eq!(approved.approved_by.as_deref(), Some("ops@example.com"));

        // Disabling and re-enabling through update is now legal.
        let disabled = store
            .update(&PatternDelta {
                pattern_id: pattern.id.clone(),
                auto_fix_enabled: Some(false),
                ..PatternDelta::default()
            })
            .unwrap();
        assert!(!disabled.auto_fix_enabled);
        let enabled = store
            .update(&PatternDelta {
                pattern_id: pattern.id,
                auto_fix_enabled: Some(true),
                ..PatternDelta::default()
            })
            .unwrap();
        assert!(enabled.auto_fix_enabled);
    }

    #[test]
    fn approval_rejects_empty_script() {
        let store = InMemoryPatternStore::new();
        let pattern = make_pattern("pattern_a", 1);
        store.create(&pattern).unwrap();
        let err = store
            .approve_auto_fix(&FixApproval {
                pattern_id: pattern.id,
                fix_script: "   ".to_string(),
                fix_type: FixType::Sql,
                approved_by: "ops".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, StorageError::InvariantViolation { .. }));
    }

    #[test]
    fn applications_drive_success_rate_and_confidence() {
        let store = InMemoryPatternStore::new();
        let pattern = make_pattern("pattern_a", 3);
        store.create(&pattern).unwrap();

        let after_success = store
            .append_application(&make_record(&pattern.id, true))
            .unwrap();
        assert_eq!(after_success.success_rate, 100.0);
        assert!(after_success.confidence_score > DEFAULT_INITIAL_CONFIDENCE);

        let after_failure = store
            .append_application(&make_record(&pattern.id, false))
            .unwrap();
        assert_eq!(after_failure.success_rate, 50.0);
        assert!(after_failure.confidence_score < after_success.confidence_score);

        let history = store.applications_for(&pattern.id).unwrap();
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn append_for_unknown_pattern_fails() {
        let store = InMemoryPatternStore::new();
        let err = store
            .append_application(&make_record("missing", true))
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
    }

    #[test]
    fn clustering_list_filters_and_orders() {
        let store = InMemoryPatternStore::new();
        store.create(&make_pattern("pattern_a", 5)).unwrap();
        store.create(&make_pattern("pattern_b", 2)).unwrap();
        store.create(&make_pattern("pattern_c", 9)).unwrap();

        let eligible = store.list_for_clustering(3).unwrap();
        let signatures: Vec<&str> = eligible
            .iter()
            .map(|p| p.pattern_signature.as_str())
            .collect();
        assert_eq!(signatures, vec!["pattern_c", "pattern_a"]);
    }

    #[test]
    fn recent_error_count_respects_window() {
        let store = InMemoryPatternStore::new();
        let now = epoch_secs();
        store
            .record_incident(&IncidentRecord {
                incident_id: Some("inc-1".to_string()),
                error_source: "database".to_string(),
                severity: Severity::Error,
                seen_at: now,
            })
            .unwrap();
        store
            .record_incident(&IncidentRecord {
                incident_id: Some("inc-2".to_string()),
                error_source: "database".to_string(),
                severity: Severity::Error,
                seen_at: now - 3_600,
            })
            .unwrap();
        assert_eq!(store.recent_error_count(300).unwrap(), 1);
        assert_eq!(store.recent_error_count(7_200).unwrap(), 2);
    }

    #[test]
    fn statistics_aggregate_counts_and_rates() {
        let store = InMemoryPatternStore::new();
        let applied = make_pattern("pattern_a", 4);
        store.create(&applied).unwrap();
        let mut api = make_pattern("pattern_b", 1);
        api.pattern_type = PatternType::Api;
        store.create(&api).unwrap();
        store
            .append_application(&make_record(&applied.id, true))
            .unwrap();

        let stats = store.statistics().unwrap();
        assert_eq!(stats.total_patterns, 2);
        assert_eq!(stats.total_applications, 1);
        assert_eq!(stats.avg_success_rate, 100.0);
        assert_eq!(stats.patterns_by_type["database"], 1);
        assert_eq!(stats.patterns_by_type["api"], 1);
        assert_eq!(stats.patterns_by_type["stripe"], 0);
    }

    #[test]
    fn rollback_target_prefers_newest_verified_older_deployment() {
        let store = InMemoryDeploymentStore::new();
        let current = make_deployment("d3", 300, false);
        store.record_deployment(&make_deployment("d1", 100, true)).unwrap();
        store.record_deployment(&make_deployment("d2", 200, true)).unwrap();
        store.record_deployment(&current).unwrap();

        let target = store.rollback_target(&current).unwrap().unwrap();
        assert_eq!(target.id, "d2");
    }

    #[test]
    fn rollback_target_skips_unverified_and_newer_deployments() {
        let store = InMemoryDeploymentStore::new();
        let current = make_deployment("d2", 200, false);
        store.record_deployment(&make_deployment("d1", 100, false)).unwrap();
        store.record_deployment(&current).unwrap();
        store.record_deployment(&make_deployment("d4", 400, true)).unwrap();

        assert!(store.rollback_target(&current).unwrap().is_none());
    }

    #[test]
    fn rollback_events_update_and_list_newest_first() {
        let store = InMemoryDeploymentStore::new();
        let mut event = RollbackEvent {
            id: "ev-1".to_string(),
            deployment_id: "d1".to_string(),
            target_deployment_id: None,
            trigger: RollbackTrigger::Automatic,
            reason: "High error rate".to_string(),
            status: RollbackStatus::Pending,
            steps: vec![],
            pre_snapshot_id: None,
            post_snapshot_id: None,
            error: None,
            initiated_by: None,
            initiated_at: 100,
            completed_at: None,
        };
        store.create_rollback_event(&event).unwrap();
        event.status = RollbackStatus::Success;
        event.completed_at = Some(150);
        store.update_rollback_event(&event).unwrap();

        let mut later = event.clone();
        later.id = "ev-2".to_string();
        later.initiated_at = 200;
        store.create_rollback_event(&later).unwrap();

        let recent = store.recent_rollbacks(10).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, "ev-2");
        assert_eq!(recent[1].status, RollbackStatus::Success);
    }

    #[test]
    fn mark_rolled_back_stamps_deployment() {
        let store = InMemoryDeploymentStore::new();
        store.record_deployment(&make_deployment("d1", 100, true)).unwrap();
        store.mark_rolled_back("d1", 500).unwrap();
        let deployment = store.deployment("d1").unwrap().unwrap();
        assert_eq!(deployment.status, DeploymentStatus::RolledBack);
        assert_eq!(deployment.rolled_back_at, Some(500));
    }

    #[test]
    fn snapshots_capture_kind_and_summary() {
        let store = InMemoryDeploymentStore::new();
        store.record_deployment(&make_deployment("d1", 100, true)).unwrap();
        let snapshot = store.create_snapshot("d1", SnapshotKind::PreRollback).unwrap();
        assert_eq!(snapshot.kind, SnapshotKind::PreRollback);
        assert_eq!(snapshot.deployment_id, "d1");
        assert_eq!(snapshot.summary["deployments"], 1);
    }
}
