//! Persistence layer errors.

use super::error_code::{self, MendErrorCode};

/// Errors that can occur in a pattern or deployment store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("Database busy: {message}")]
    DatabaseBusy { message: String },

    #[error("Serialization error: {message}")]
    SerializationError { message: String },

    #[error("Migration failed at version {version}: {message}")]
    MigrationFailed { version: i32, message: String },

    #[error("Duplicate pattern signature: {signature}")]
    DuplicateSignature { signature: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Invariant violation: {message}")]
    InvariantViolation { message: String },
}

impl StorageError {
    /// Wraps a serde_json failure.
    pub fn serialization(err: serde_json::Error) -> Self {
        Self::SerializationError {
            message: err.to_string(),
        }
    }
}

impl MendErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DatabaseBusy { .. } => error_code::DB_BUSY,
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            Self::DuplicateSignature { .. } => error_code::DUPLICATE_SIGNATURE,
            Self::NotFound { .. } => error_code::NOT_FOUND,
            Self::InvariantViolation { .. } => error_code::INVARIANT_VIOLATION,
            _ => error_code::STORAGE_ERROR,
        }
    }
}
