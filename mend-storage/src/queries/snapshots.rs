//! Queries for the system_snapshots table.

use mend_core::errors::StorageError;
use mend_core::types::{SnapshotKind, SystemSnapshot};
use rusqlite::{params, Connection};

use super::util::{json_column, sqlite_err, to_json};

const COLUMNS: &str = "id, deployment_id, kind, summary, created_at";

pub fn insert(conn: &Connection, snapshot: &SystemSnapshot) -> Result<(), StorageError> {
    let summary = to_json(&snapshot.summary)?;
    let mut stmt = conn
        .prepare_cached(&format!(
            "INSERT INTO system_snapshots ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5)"
        ))
        .map_err(sqlite_err)?;
    stmt.execute(params![
        snapshot.id,
        snapshot.deployment_id,
        snapshot.kind.as_str(),
        summary,
        snapshot.created_at,
    ])
    .map_err(sqlite_err)?;
    Ok(())
}

/// Snapshots captured for one deployment, oldest first.
pub fn list_for_deployment(
    conn: &Connection,
    deployment_id: &str,
) -> Result<Vec<SystemSnapshot>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLUMNS} FROM system_snapshots WHERE deployment_id = ?1 ORDER BY rowid ASC"
        ))
        .map_err(sqlite_err)?;
    let rows = stmt
        .query_map(params![deployment_id], map_row)
        .map_err(sqlite_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sqlite_err)
}

fn map_row(row: &rusqlite::Row) -> rusqlite::Result<SystemSnapshot> {
    let kind: String = row.get(2)?;
    let summary_raw: String = row.get(3)?;
    Ok(SystemSnapshot {
        id: row.get(0)?,
        deployment_id: row.get(1)?,
        kind: SnapshotKind::parse_lossy(&kind),
        summary: json_column(&summary_raw, 3)?,
        created_at: row.get(4)?,
    })
}
