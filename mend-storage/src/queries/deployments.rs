//! Queries for the deployments table.

use mend_core::errors::StorageError;
use mend_core::types::{Deployment, DeploymentStatus};
use rusqlite::{params, Connection, OptionalExtension};

use super::util::sqlite_err;

const COLUMNS: &str =
    "id, version, environment, status, health_check_passed, deployed_at, rolled_back_at";

/// Inserts or replaces a deployment row.
pub fn upsert(conn: &Connection, deployment: &Deployment) -> Result<(), StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "INSERT OR REPLACE INTO deployments ({COLUMNS}) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
        ))
        .map_err(sqlite_err)?;
    stmt.execute(params![
        deployment.id,
        deployment.version,
        deployment.environment,
        deployment.status.as_str(),
        deployment.health_check_passed,
        deployment.deployed_at,
        deployment.rolled_back_at,
    ])
    .map_err(sqlite_err)?;
    Ok(())
}

pub fn find_by_id(
    conn: &Connection,
    deployment_id: &str,
) -> Result<Option<Deployment>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!("SELECT {COLUMNS} FROM deployments WHERE id = ?1"))
        .map_err(sqlite_err)?;
    stmt.query_row(params![deployment_id], map_row)
        .optional()
        .map_err(sqlite_err)
}

/// Most recent verified deployment in the same environment, older than
/// `current`. Unverified deployments never qualify.
pub fn find_rollback_target(
    conn: &Connection,
    current: &Deployment,
) -> Result<Option<Deployment>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLUMNS} FROM deployments \
             WHERE environment = ?1 AND id != ?2 AND deployed_at < ?3 \
                 AND health_check_passed = 1 \
             ORDER BY deployed_at DESC LIMIT 1"
        ))
        .map_err(sqlite_err)?;
    stmt.query_row(
        params![current.environment, current.id, current.deployed_at],
        map_row,
    )
    .optional()
    .map_err(sqlite_err)
}

pub fn mark_rolled_back(
    conn: &Connection,
    deployment_id: &str,
    at: i64,
) -> Result<(), StorageError> {
    let changed = conn
        .execute(
            "UPDATE deployments SET status = ?2, rolled_back_at = ?3 WHERE id = ?1",
            params![deployment_id, DeploymentStatus::RolledBack.as_str(), at],
        )
        .map_err(sqlite_err)?;
    if changed == 0 {
        return Err(StorageError::NotFound {
            entity: "deployment",
            id: deployment_id.to_string(),
        });
    }
    Ok(())
}

pub fn count(conn: &Connection) -> Result<u64, StorageError> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM deployments", [], |row| row.get(0))
        .map_err(sqlite_err)?;
    Ok(count as u64)
}

fn map_row(row: &rusqlite::Row) -> rusqlite::Result<Deployment> {
    let status: String = row.get(3)?;
    Ok(Deployment {
        id: row.get(0)?,
        version: row.get(1)?,
        environment: row.get(2)?,
        status: DeploymentStatus::parse_lossy(&status),
        health_check_passed: row.get(4)?,
        deployed_at: row.get(5)?,
        rolled_back_at: row.get(6)?,
    })
}
