//! Epoch time helpers.
//!
//! All persisted timestamps are Unix epoch seconds, matching the storage
//! layer's `unixepoch()` column defaults.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current Unix time in seconds.
pub fn epoch_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Current Unix time in milliseconds.
pub fn epoch_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
