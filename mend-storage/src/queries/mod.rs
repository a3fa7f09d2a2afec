//! Query modules, one per domain table.

pub mod util;

pub mod applications;
pub mod clusters;
pub mod deployments;
pub mod incidents;
pub mod patterns;
pub mod rollbacks;
pub mod snapshots;
