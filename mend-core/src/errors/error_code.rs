//! MendErrorCode trait for structured error codes.

/// Trait for attaching a stable code string to Mend errors.
/// Every error enum implements this so logs and event payloads carry a
/// machine-readable code alongside the human-readable message.
pub trait MendErrorCode {
    /// Returns the error code string (e.g., "STORAGE_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

// Error code constants.
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const DB_BUSY: &str = "DB_BUSY";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const DUPLICATE_SIGNATURE: &str = "DUPLICATE_SIGNATURE";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const INVARIANT_VIOLATION: &str = "INVARIANT_VIOLATION";
pub const LEARN_ERROR: &str = "LEARN_ERROR";
pub const EXECUTION_FAILED: &str = "EXECUTION_FAILED";
pub const EXECUTION_TIMEOUT: &str = "EXECUTION_TIMEOUT";
pub const HEALTH_UNAVAILABLE: &str = "HEALTH_UNAVAILABLE";
pub const DEPLOYMENT_NOT_FOUND: &str = "DEPLOYMENT_NOT_FOUND";
pub const NO_ROLLBACK_TARGET: &str = "NO_ROLLBACK_TARGET";
pub const ROLLBACK_FAILED: &str = "ROLLBACK_FAILED";
pub const POLICY_DENIED: &str = "POLICY_DENIED";
