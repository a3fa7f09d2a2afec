//! Shared helpers for error mapping and JSON columns.

use mend_core::errors::StorageError;

/// Maps a rusqlite failure onto the storage error taxonomy.
pub fn sqlite_err(err: rusqlite::Error) -> StorageError {
    match &err {
        rusqlite::Error::SqliteFailure(code, _)
            if code.code == rusqlite::ErrorCode::DatabaseBusy
                || code.code == rusqlite::ErrorCode::DatabaseLocked =>
        {
            StorageError::DatabaseBusy {
                message: err.to_string(),
            }
        }
        _ => StorageError::SqliteError {
            message: err.to_string(),
        },
    }
}

/// True when the failure is a UNIQUE constraint violation.
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(code, _)
            if code.code == rusqlite::ErrorCode::ConstraintViolation
    ) && err.to_string().contains("UNIQUE")
}

/// Serializes a value for a JSON TEXT column.
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(StorageError::serialization)
}

/// Parses a JSON TEXT column inside a row-mapping closure, reporting the
/// failing column index through rusqlite's conversion error.
pub fn json_column<T: serde::de::DeserializeOwned>(raw: &str, idx: usize) -> rusqlite::Result<T> {
    serde_json::from_str(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
