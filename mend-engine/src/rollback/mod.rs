//! Deployment health evaluation and audited rollback execution.
//!
//! [`RollbackDecisionEngine`] answers "should this deployment be rolled
//! back" from a live health snapshot; [`RollbackExecutor`] then drives
//! the rollback state machine against the deployment store, producing a
//! persisted [`RollbackOutcome`] whatever happens along the way.

pub mod decision;
pub mod executor;
pub mod monitor;

pub use decision::{RollbackDecision, RollbackDecisionEngine};
pub use executor::{RollbackExecutor, RollbackOutcome, RollbackRunner};
pub use monitor::HealthMonitor;
