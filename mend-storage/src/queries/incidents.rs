//! Queries for the incidents table.

use mend_core::errors::StorageError;
use mend_core::store::IncidentRecord;
use rusqlite::{params, Connection};

use super::util::sqlite_err;

pub fn insert(conn: &Connection, incident: &IncidentRecord) -> Result<(), StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO incidents (incident_id, error_source, severity, seen_at) \
             VALUES (?1, ?2, ?3, ?4)",
        )
        .map_err(sqlite_err)?;
    stmt.execute(params![
        incident.incident_id,
        incident.error_source,
        incident.severity.as_str(),
        incident.seen_at,
    ])
    .map_err(sqlite_err)?;
    Ok(())
}

/// Incidents seen at or after `cutoff`.
pub fn count_since(conn: &Connection, cutoff: i64) -> Result<u64, StorageError> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM incidents WHERE seen_at >= ?1",
            params![cutoff],
            |row| row.get(0),
        )
        .map_err(sqlite_err)?;
    Ok(count as u64)
}
