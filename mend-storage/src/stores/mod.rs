//! Durable store implementations over mutex-guarded connections.

pub mod deployment;
pub mod pattern;

pub use deployment::SqliteDeploymentStore;
pub use pattern::SqlitePatternStore;
