//! Connection construction and PRAGMA configuration.

pub mod pragmas;

use std::path::Path;

use mend_core::errors::StorageError;
use rusqlite::Connection;

use crate::migrations;

/// Opens (creating if missing) the database at `path`, applies pragmas,
/// and runs pending migrations.
pub fn open(path: impl AsRef<Path>) -> Result<Connection, StorageError> {
    let path = path.as_ref();
    let conn = Connection::open(path).map_err(|e| StorageError::SqliteError {
        message: format!("failed to open {}: {e}", path.display()),
    })?;
    prepare(conn)
}

/// Opens a private in-memory database, for tests and single-run usage.
pub fn open_in_memory() -> Result<Connection, StorageError> {
    let conn = Connection::open_in_memory().map_err(|e| StorageError::SqliteError {
        message: format!("failed to open in-memory database: {e}"),
    })?;
    prepare(conn)
}

fn prepare(conn: Connection) -> Result<Connection, StorageError> {
    pragmas::apply_pragmas(&conn)?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}
