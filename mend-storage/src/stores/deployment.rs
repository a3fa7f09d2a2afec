//! Durable [`DeploymentStore`] backed by SQLite.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use mend_core::errors::StorageError;
use mend_core::store::DeploymentStore;
use mend_core::types::time::epoch_secs;
use mend_core::types::{Deployment, RollbackEvent, SnapshotKind, SystemSnapshot};
use rusqlite::Connection;
use uuid::Uuid;

use crate::connection;
use crate::queries::{deployments, rollbacks, snapshots};

/// SQLite [`DeploymentStore`].
pub struct SqliteDeploymentStore {
    conn: Mutex<Connection>,
}

impl SqliteDeploymentStore {
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

    /// Snapshots captured for one deployment, oldest first.
    pub fn snapshots_for(&self, deployment_id: &str) -> Result<Vec<SystemSnapshot>, StorageError> {
        let conn = self.conn()?;
        snapshots::list_for_deployment(&conn, deployment_id)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::InvariantViolation {
            message: "deployment store connection lock poisoned".to_string(),
        })
    }
}

impl DeploymentStore for SqliteDeploymentStore {
    fn record_deployment(&self, deployment: &Deployment) -> Result<(), StorageError> {
        let conn = self.conn()?;
        deployments::upsert(&conn, deployment)
    }

    fn deployment(&self, deployment_id: &str) -> Result<Option<Deployment>, StorageError> {
        let conn = self.conn()?;
        deployments::find_by_id(&conn, deployment_id)
    }

    fn rollback_target(&self, current: &Deployment) -> Result<Option<Deployment>, StorageError> {
        let conn = self.conn()?;
        deployments::find_rollback_target(&conn, current)
    }

    fn create_rollback_event(&self, event: &RollbackEvent) -> Result<(), StorageError> {
        let conn = self.conn()?;
        rollbacks::insert(&conn, event)
    }

    fn update_rollback_event(&self, event: &RollbackEvent) -> Result<(), StorageError> {
        let conn = self.conn()?;
        rollbacks::update(&conn, event)
    }

    fn recent_rollbacks(&self, limit: usize) -> Result<Vec<RollbackEvent>, StorageError> {
        let conn = self.conn()?;
        rollbacks::list_recent(&conn, limit)
    }

    fn create_snapshot(
        &self,
        deployment_id: &str,
        kind: SnapshotKind,
    ) -> Result<SystemSnapshot, StorageError> {
        let conn = self.conn()?;
        let snapshot = SystemSnapshot {
            id: Uuid::new_v4().to_string(),
            deployment_id: deployment_id.to_string(),
            kind,
            summary: serde_json::json!({
                "deployments": deployments::count(&conn)?,
                "rollback_events": rollbacks::count(&conn)?,
            }),
            created_at: epoch_secs(),
        };
        snapshots::insert(&conn, &snapshot)?;
        Ok(snapshot)
    }

    fn mark_rolled_back(&self, deployment_id: &str, at: i64) -> Result<(), StorageError> {
        let conn = self.conn()?;
        deployments::mark_rolled_back(&conn, deployment_id, at)
    }
}
