//! Bounded execution of blocking collaborator calls.
//!
//! Fix scripts, health probes, and rollback steps all cross a process
//! boundary somewhere. Every such call runs through [`call_with_timeout`]
//! so a hung collaborator surfaces as a timeout instead of stalling the
//! pipeline.

use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, RecvTimeoutError};

/// Runs `call` on a worker thread and waits at most `timeout_ms` for its
/// result.
///
/// Returns `None` on timeout, which callers must treat exactly like a
/// reported failure. The worker is not cancelled; a late result is dropped
/// when the channel closes. A panicking worker also reads as `None`.
pub fn call_with_timeout<T, F>(timeout_ms: u64, call: F) -> Option<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = bounded(1);
    thread::spawn(move || {
        let _ = tx.send(call());
    });
    match rx.recv_timeout(Duration::from_millis(timeout_ms)) {
        Ok(value) => Some(value),
        Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
    }
}
