//! Pipeline engines for mend.
//!
//! Leaf-first: feature extraction and signature generation are pure
//! functions, the learning/clustering/compliance layers are I/O-free over
//! the store traits, and the remediation/rollback orchestrators tie them
//! together. Fix execution and health probing stay behind traits so the
//! engines never talk to the outside world directly.

pub mod clustering;
pub mod compliance;
pub mod exec;
pub mod features;
pub mod learning;
pub mod pipeline;
pub mod remediation;
pub mod report;
pub mod rollback;
pub mod signature;
