//! Queries for the rollback_events table.

use mend_core::errors::StorageError;
use mend_core::types::{RollbackEvent, RollbackStatus, RollbackTrigger};
use rusqlite::{params, Connection};

use super::util::{json_column, sqlite_err, to_json};

const COLUMNS: &str = "id, deployment_id, target_deployment_id, trigger_type, reason, status, \
     steps, pre_snapshot_id, post_snapshot_id, error, initiated_by, initiated_at, completed_at";

pub fn insert(conn: &Connection, event: &RollbackEvent) -> Result<(), StorageError> {
    let steps = to_json(&event.steps)?;
    let mut stmt = conn
        .prepare_cached(&format!(
            "INSERT INTO rollback_events ({COLUMNS}) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
        ))
        .map_err(sqlite_err)?;
    stmt.execute(params![
        event.id,
        event.deployment_id,
        event.target_deployment_id,
        event.trigger.as_str(),
        event.reason,
        event.status.as_str(),
        steps,
        event.pre_snapshot_id,
        event.post_snapshot_id,
        event.error,
        event.initiated_by,
        event.initiated_at,
        event.completed_at,
    ])
    .map_err(sqlite_err)?;
    Ok(())
}

/// Replaces a persisted event: status transitions, step log, snapshot ids.
pub fn update(conn: &Connection, event: &RollbackEvent) -> Result<(), StorageError> {
    let steps = to_json(&event.steps)?;
    let changed = conn
        .execute(
            "UPDATE rollback_events SET \
                 target_deployment_id = ?2, status = ?3, steps = ?4, pre_snapshot_id = ?5, \
                 post_snapshot_id = ?6, error = ?7, completed_at = ?8 \
             WHERE id = ?1",
            params![
                event.id,
                event.target_deployment_id,
                event.status.as_str(),
                steps,
                event.pre_snapshot_id,
                event.post_snapshot_id,
                event.error,
                event.completed_at,
            ],
        )
        .map_err(sqlite_err)?;
    if changed == 0 {
        return Err(StorageError::NotFound {
            entity: "rollback event",
            id: event.id.clone(),
        });
    }
    Ok(())
}

pub fn list_recent(conn: &Connection, limit: usize) -> Result<Vec<RollbackEvent>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLUMNS} FROM rollback_events \
             ORDER BY initiated_at DESC, rowid DESC LIMIT ?1"
        ))
        .map_err(sqlite_err)?;
    let rows = stmt
        .query_map(params![limit as i64], map_row)
        .map_err(sqlite_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sqlite_err)
}

pub fn count(conn: &Connection) -> Result<u64, StorageError> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM rollback_events", [], |row| row.get(0))
        .map_err(sqlite_err)?;
    Ok(count as u64)
}

fn map_row(row: &rusqlite::Row) -> rusqlite::Result<RollbackEvent> {
    let trigger: String = row.get(3)?;
    let status: String = row.get(5)?;
    let steps_raw: String = row.get(6)?;
    Ok(RollbackEvent {
        id: row.get(0)?,
        deployment_id: row.get(1)?,
        target_deployment_id: row.get(2)?,
        trigger: RollbackTrigger::parse_lossy(&trigger),
        reason: row.get(4)?,
        status: RollbackStatus::parse_lossy(&status),
        steps: json_column(&steps_raw, 6)?,
        pre_snapshot_id: row.get(7)?,
        post_snapshot_id: row.get(8)?,
        error: row.get(9)?,
        initiated_by: row.get(10)?,
        initiated_at: row.get(11)?,
        completed_at: row.get(12)?,
    })
}
