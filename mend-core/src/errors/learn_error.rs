//! Pattern learning errors.

use super::error_code::{self, MendErrorCode};
use super::storage_error::StorageError;

/// Errors that can occur while learning a pattern from telemetry.
#[derive(Debug, thiserror::Error)]
pub enum LearnError {
    #[error("Empty error message")]
    EmptyMessage,

    #[error("Empty error source")]
    EmptySource,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl MendErrorCode for LearnError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Storage(err) => err.error_code(),
            _ => error_code::LEARN_ERROR,
        }
    }
}
