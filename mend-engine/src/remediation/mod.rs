//! Automated remediation behind the compliance gate.

pub mod applier;
pub mod executor;

pub use applier::{ApplyOutcome, RemediationApplier};
pub use executor::{FixExecutor, FixOutcome};
