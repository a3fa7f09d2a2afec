//! Shared constants for the Mend self-healing pipeline.

/// Mend version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ---- Learning ----

/// Initial confidence score for a newly learned pattern.
pub const DEFAULT_INITIAL_CONFIDENCE: f64 = 0.5;

/// Confidence gained per consecutive successful application.
pub const CONFIDENCE_SUCCESS_STEP: f64 = 0.05;

/// Confidence lost per failed application.
pub const CONFIDENCE_FAILURE_STEP: f64 = 0.1;

/// Default lookback window for the recent-error count, in seconds.
pub const DEFAULT_RECENT_ERROR_WINDOW_SECS: i64 = 300;

// ---- Clustering ----

/// Default minimum occurrences for a pattern to enter clustering.
pub const DEFAULT_MIN_CLUSTER_OCCURRENCES: u64 = 3;

/// Lower bound on the k-means cluster count.
pub const KMEANS_MIN_CLUSTERS: usize = 2;

/// Upper bound on the k-means cluster count.
pub const KMEANS_MAX_CLUSTERS: usize = 5;

/// Maximum Lloyd's iterations per clustering run.
pub const KMEANS_MAX_ITERATIONS: usize = 10;

// ---- Rollback thresholds ----

/// Errors per minute above which a deployment is rolled back.
pub const DEFAULT_ERROR_RATE_THRESHOLD: f64 = 5.0;

/// Recent error count (5-minute window) above which a deployment is rolled back.
pub const DEFAULT_RECENT_ERRORS_THRESHOLD: u64 = 50;

/// Database connection count above which a deployment is rolled back.
pub const DEFAULT_DB_CONNECTIONS_THRESHOLD: u64 = 90;

/// Sentinel error rate reported when the health source is unreachable.
pub const SENTINEL_ERROR_RATE: f64 = 999.0;

/// Sentinel recent-error count paired with [`SENTINEL_ERROR_RATE`].
pub const SENTINEL_RECENT_ERRORS: u64 = 999;

/// Default number of events returned by rollback history queries.
pub const DEFAULT_ROLLBACK_HISTORY_LIMIT: usize = 10;

// ---- Timeouts ----

/// Default fix execution timeout in milliseconds.
pub const DEFAULT_EXECUTION_TIMEOUT_MS: u64 = 30_000;

/// Default health snapshot fetch timeout in milliseconds.
pub const DEFAULT_HEALTH_TIMEOUT_MS: u64 = 5_000;

/// Default rollback apply timeout in milliseconds.
pub const DEFAULT_ROLLBACK_TIMEOUT_MS: u64 = 60_000;

// ---- Compliance envelope ----

/// System disorder per recent error: entropy = recent errors / this divisor.
pub const ENTROPY_ERROR_DIVISOR: f64 = 100.0;

/// System entropy above which the gate attaches an instability warning.
pub const ENTROPY_WARNING_LEVEL: f64 = 0.1;

/// Entropy delta claimed by the remediation action profile.
pub const REMEDIATION_ENTROPY_DELTA: f64 = -0.05;

/// Entropy delta claimed by the rollback action profile.
pub const ROLLBACK_ENTROPY_DELTA: f64 = -0.1;

/// Structural ratio shared by the approved action profiles.
pub const PROFILE_STRUCTURAL_RATIO: f64 = 1.618_033_988_75;

/// Target frequency in Hz shared by the approved action profiles.
pub const PROFILE_TARGET_FREQUENCY_HZ: f64 = 7.83;

/// Tolerance for structural parameter matching.
pub const PROFILE_MATCH_EPSILON: f64 = 1e-9;

// ---- Caches ----

/// Capacity of the compiled matcher cache.
pub const MATCHER_CACHE_CAPACITY: u64 = 1_024;
