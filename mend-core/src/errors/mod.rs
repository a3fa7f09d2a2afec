//! Error types for Mend.
//! Per-subsystem thiserror enums with structured error codes.

pub mod config_error;
pub mod error_code;
pub mod learn_error;
pub mod remediation_error;
pub mod rollback_error;
pub mod storage_error;

pub use config_error::ConfigError;
pub use error_code::MendErrorCode;
pub use learn_error::LearnError;
pub use remediation_error::RemediationError;
pub use rollback_error::RollbackError;
pub use storage_error::StorageError;
