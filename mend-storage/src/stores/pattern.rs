//! Durable [`PatternStore`] backed by SQLite.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use mend_core::errors::StorageError;
use mend_core::store::{
    FixApproval, IncidentRecord, PatternDelta, PatternStore, UpsertOutcome,
};
use mend_core::types::confidence;
use mend_core::types::time::epoch_secs;
use mend_core::types::{ApplicationRecord, ErrorPattern, PatternCluster, PatternStatistics};
use rusqlite::Connection;

use crate::connection;
use crate::queries::util::sqlite_err;
use crate::queries::{applications, clusters, incidents, patterns};

/// SQLite [`PatternStore`].
///
/// One mutex-guarded write connection serializes all callers, so every
/// lookup-then-write sequence below is atomic in-process; the learn-path
/// upsert additionally stays a single statement, making it atomic across
/// processes sharing the database file.
pub struct SqlitePatternStore {
    conn: Mutex<Connection>,
}

impl SqlitePatternStore {
    /// Opens (creating and migrating if needed) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        Ok(Self {
            conn: Mutex::new(connection::open(path)?),
        })
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self {
            conn: Mutex::new(connection::open_in_memory()?),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::InvariantViolation {
            message: "pattern store connection lock poisoned".to_string(),
        })
    }
}

impl PatternStore for SqlitePatternStore {
    fn find_by_signature(&self, signature: &str) -> Result<Option<ErrorPattern>, StorageError> {
        let conn = self.conn()?;
        patterns::find_by_signature(&conn, signature)
    }

    fn create(&self, pattern: &ErrorPattern) -> Result<(), StorageError> {
        if !pattern.invariants_hold() {
            return Err(StorageError::InvariantViolation {
                message: format!("pattern {} violates invariants", pattern.id),
            });
        }
        let conn = self.conn()?;
        patterns::insert(&conn, pattern)
    }

    fn update(&self, delta: &PatternDelta) -> Result<ErrorPattern, StorageError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(sqlite_err)?;
        let existing = patterns::find_by_id(&tx, &delta.pattern_id)?.ok_or_else(|| {
            StorageError::NotFound {
                entity: "pattern",
                id: delta.pattern_id.clone(),
            }
        })?;
        if delta.auto_fix_enabled == Some(true) && !existing.human_approved {
            return Err(StorageError::InvariantViolation {
                message: format!(
                    "cannot enable auto-fix without human approval: {}",
                    delta.pattern_id
                ),
            });
        }
        let updated = patterns::apply_delta(
            &tx,
            &delta.pattern_id,
            delta.severity,
            delta.error_matcher.as_deref(),
            delta.auto_fix_enabled,
            epoch_secs(),
        )?;
        tx.commit().map_err(sqlite_err)?;
        Ok(updated)
    }

    fn upsert_occurrence(&self, candidate: &ErrorPattern) -> Result<UpsertOutcome, StorageError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(sqlite_err)?;
        let outcome = patterns::upsert_occurrence(&tx, candidate)?;
        if outcome.newly_created() {
            // dropping the uncommitted transaction discards the insert
            if !candidate.invariants_hold() {
                return Err(StorageError::InvariantViolation {
                    message: format!("pattern {} violates invariants", candidate.id),
                });
            }
            tx.commit().map_err(sqlite_err)?;
            return Ok(outcome);
        }

        let mut pattern = outcome.pattern;
        let mut merged = false;
        for incident_id in &candidate.learned_from_incidents {
            if !pattern.learned_from_incidents.contains(incident_id) {
                pattern.learned_from_incidents.push(incident_id.clone());
                merged = true;
            }
        }
        if merged {
            patterns::set_incident_ids(&tx, &pattern.id, &pattern.learned_from_incidents)?;
        }
        tx.commit().map_err(sqlite_err)?;
        Ok(UpsertOutcome {
            pattern,
            disposition: outcome.disposition,
        })
    }

    fn approve_auto_fix(&self, approval: &FixApproval) -> Result<ErrorPattern, StorageError> {
        if approval.fix_script.trim().is_empty() {
            return Err(StorageError::InvariantViolation {
                message: "approval requires a non-empty fix script".to_string(),
            });
        }
        let conn = self.conn()?;
        patterns::approve(
            &conn,
            &approval.pattern_id,
            &approval.fix_script,
            approval.fix_type,
            &approval.approved_by,
            epoch_secs(),
        )
    }

    fn append_application(&self, record: &ApplicationRecord) -> Result<ErrorPattern, StorageError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(sqlite_err)?;
        let pattern = patterns::find_by_id(&tx, &record.pattern_id)?.ok_or_else(|| {
            StorageError::NotFound {
                entity: "pattern",
                id: record.pattern_id.clone(),
            }
        })?;
        let history = applications::outcomes_for_pattern(&tx, &record.pattern_id)?;
        let streak_before = confidence::trailing_successes(&history);
        applications::insert(&tx, record)?;

        let successes =
            history.iter().filter(|success| **success).count() as u64 + u64::from(record.success);
        let total = history.len() as u64 + 1;
        let success_rate = confidence::success_rate(successes, total);
        let confidence_score =
            confidence::adjust_confidence(pattern.confidence_score, record.success, streak_before);
        let updated = patterns::update_scores(
            &tx,
            &record.pattern_id,
            success_rate,
            confidence_score,
            record.applied_at,
        )?;
        tx.commit().map_err(sqlite_err)?;
        Ok(updated)
    }

    fn applications_for(
        &self,
        pattern_id: &str,
    ) -> Result<Vec<ApplicationRecord>, StorageError> {
        let conn = self.conn()?;
        applications::list_for_pattern(&conn, pattern_id)
    }

    fn list_for_clustering(
        &self,
        min_occurrences: u64,
    ) -> Result<Vec<ErrorPattern>, StorageError> {
        let conn = self.conn()?;
        patterns::list_for_clustering(&conn, min_occurrences)
    }

    fn list_auto_fix_enabled(&self) -> Result<Vec<ErrorPattern>, StorageError> {
        let conn = self.conn()?;
        patterns::list_auto_fix_enabled(&conn)
    }

    fn record_incident(&self, incident: &IncidentRecord) -> Result<(), StorageError> {
        let conn = self.conn()?;
        incidents::insert(&conn, incident)
    }

    fn recent_error_count(&self, window_secs: i64) -> Result<u64, StorageError> {
        let conn = self.conn()?;
        incidents::count_since(&conn, epoch_secs() - window_secs)
    }

    fn replace_clusters(&self, new_clusters: &[PatternCluster]) -> Result<(), StorageError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(sqlite_err)?;
        clusters::replace_all(&tx, new_clusters)?;
        tx.commit().map_err(sqlite_err)
    }

    fn list_clusters(&self) -> Result<Vec<PatternCluster>, StorageError> {
        let conn = self.conn()?;
        clusters::list_all(&conn)
    }

    fn statistics(&self) -> Result<PatternStatistics, StorageError> {
        let conn = self.conn()?;
        patterns::statistics(&conn)
    }
}
