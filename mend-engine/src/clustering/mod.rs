//! Advisory pattern clustering.

pub mod engine;
pub mod kmeans;

pub use engine::ClusteringEngine;
pub use kmeans::{cluster_count, kmeans, KmeansResult};
