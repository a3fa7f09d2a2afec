//! Domain types for the self-healing pipeline.
//! Patterns, applications, clusters, deployments, rollbacks, and the
//! shared confidence arithmetic.

pub mod cluster;
pub mod collections;
pub mod compliance;
pub mod confidence;
pub mod deployment;
pub mod pattern;
pub mod time;

pub use cluster::PatternCluster;
pub use collections::{FxHashMap, FxHashSet};
pub use compliance::ComplianceDecision;
pub use deployment::{
    Deployment, DeploymentHealthSnapshot, DeploymentStatus, RollbackEvent, RollbackStatus,
    RollbackStep, RollbackTrigger, SnapshotKind, StepStatus, SystemSnapshot,
};
pub use pattern::{
    ApplicationRecord, ErrorPattern, FixType, PatternStatistics, PatternType, Severity,
};
