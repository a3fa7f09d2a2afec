//! Health probe boundary.

use mend_core::errors::RollbackError;
use mend_core::types::DeploymentHealthSnapshot;

/// Queries live deployment health.
///
/// Implementations wrap whatever exposes the numbers (metrics endpoint,
/// database view). The decision engine converts an `Err`, a panic, or a
/// timeout into the sentinel snapshot; a monitor can never suppress a
/// rollback by failing.
pub trait HealthMonitor: Send + Sync {
    fn fetch(&self, deployment_id: &str) -> Result<DeploymentHealthSnapshot, RollbackError>;
}
