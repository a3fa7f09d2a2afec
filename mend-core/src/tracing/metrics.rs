//! Structured span field definitions for mend metrics.
//!
//! These constants define the standard field names used in tracing spans
//! across the pipeline. Using consistent field names enables structured
//! log queries and dashboard construction.

/// Learning: signature normalization and hash time in microseconds.
pub const SIGNATURE_COMPUTE_TIME: &str = "signature_compute_time";

/// Learning: feature extraction time in microseconds.
pub const FEATURE_EXTRACT_TIME: &str = "feature_extract_time";

/// Remediation: compiled-matcher cache hit rate (0.0 - 1.0).
pub const MATCHER_CACHE_HIT_RATE: &str = "matcher_cache_hit_rate";

/// Remediation: fix execution time in milliseconds.
pub const FIX_EXECUTION_TIME: &str = "fix_execution_time";

/// Compliance: gate evaluation time in microseconds.
pub const GATE_EVALUATION_TIME: &str = "gate_evaluation_time";

/// Clustering: full rebuild duration in milliseconds.
pub const CLUSTER_REBUILD_TIME: &str = "cluster_rebuild_time";

/// Rollback: health probe duration in milliseconds.
pub const HEALTH_PROBE_TIME: &str = "health_probe_time";

/// Rollback: end-to-end rollback duration in milliseconds.
pub const ROLLBACK_DURATION: &str = "rollback_duration";

/// Storage: single-statement upsert time in microseconds.
pub const UPSERT_TIME: &str = "upsert_time";
