//! Durable SQLite persistence for mend.
//!
//! [`SqlitePatternStore`] and [`SqliteDeploymentStore`] implement the
//! `mend-core` store traits over a mutex-guarded write connection with WAL
//! journaling and `PRAGMA user_version` migrations. Query modules under
//! [`queries`] hold the per-table SQL; the store implementations wrap them
//! in the transactions the trait contracts require.

pub mod connection;
pub mod migrations;
pub mod queries;
pub mod stores;

pub use stores::{SqliteDeploymentStore, SqlitePatternStore};
