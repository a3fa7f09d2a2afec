//! Queries for the pattern_applications table. Append-only.

use mend_core::errors::StorageError;
use mend_core::types::ApplicationRecord;
use rusqlite::{params, Connection};

use super::util::{json_column, sqlite_err, to_json};

const COLUMNS: &str =
    "id, pattern_id, incident_id, success, execution_time_ms, fix_script, decision, applied_at";

pub fn insert(conn: &Connection, record: &ApplicationRecord) -> Result<(), StorageError> {
    let decision = record.decision.as_ref().map(to_json).transpose()?;
    let mut stmt = conn
        .prepare_cached(&format!(
            "INSERT INTO pattern_applications ({COLUMNS}) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
        ))
        .map_err(sqlite_err)?;
    stmt.execute(params![
        record.id,
        record.pattern_id,
        record.incident_id,
        record.success,
        record.execution_time_ms as i64,
        record.fix_script,
        decision,
        record.applied_at,
    ])
    .map_err(sqlite_err)?;
    Ok(())
}

/// Full history for one pattern, oldest first.
pub fn list_for_pattern(
    conn: &Connection,
    pattern_id: &str,
) -> Result<Vec<ApplicationRecord>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLUMNS} FROM pattern_applications WHERE pattern_id = ?1 ORDER BY rowid ASC"
        ))
        .map_err(sqlite_err)?;
    let rows = stmt
        .query_map(params![pattern_id], map_row)
        .map_err(sqlite_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sqlite_err)
}

/// Success flags for one pattern in insertion order, for streak and rate
/// derivation.
pub fn outcomes_for_pattern(
    conn: &Connection,
    pattern_id: &str,
) -> Result<Vec<bool>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT success FROM pattern_applications WHERE pattern_id = ?1 ORDER BY rowid ASC",
        )
        .map_err(sqlite_err)?;
    let rows = stmt
        .query_map(params![pattern_id], |row| row.get(0))
        .map_err(sqlite_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sqlite_err)
}

fn map_row(row: &rusqlite::Row) -> rusqlite::Result<ApplicationRecord> {
    let decision_raw: Option<String> = row.get(6)?;
    let decision = match decision_raw {
        Some(raw) => Some(json_column(&raw, 6)?),
        None => None,
    };
    Ok(ApplicationRecord {
        id: row.get(0)?,
        pattern_id: row.get(1)?,
        incident_id: row.get(2)?,
        success: row.get(3)?,
        execution_time_ms: row.get::<_, i64>(4)? as u64,
        fix_script: row.get(5)?,
        decision,
        applied_at: row.get(7)?,
    })
}
