//! Learned error patterns and their application history.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::compliance::ComplianceDecision;

/// Telemetry severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// All severities, lowest first.
    pub fn all() -> [Severity; 4] {
        [Self::Info, Self::Warning, Self::Error, Self::Critical]
    }

    /// Stable string form, matching the storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }

    /// Parses a severity, defaulting unknown values to `Info`.
    pub fn parse_lossy(value: &str) -> Severity {
        match value.to_ascii_lowercase().as_str() {
            "critical" => Self::Critical,
            "error" => Self::Error,
            "warning" => Self::Warning,
            _ => Self::Info,
        }
    }

    /// Weight used by the clustering feature vector.
    pub fn cluster_weight(self) -> f64 {
        match self {
            Self::Critical => 5.0,
            Self::Error => 3.0,
            _ => 1.0,
        }
    }
}

/// Classification of a learned error pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternType {
    Database,
    Rls,
    Stripe,
    Deployment,
    Api,
}

impl PatternType {
    /// All pattern types.
    pub fn all() -> [PatternType; 5] {
        [
            Self::Database,
            Self::Rls,
            Self::Stripe,
            Self::Deployment,
            Self::Api,
        ]
    }

    /// Stable string form, matching the storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Database => "database",
            Self::Rls => "rls",
            Self::Stripe => "stripe",
            Self::Deployment => "deployment",
            Self::Api => "api",
        }
    }

    /// Parses a pattern type, defaulting unknown values to `Api`.
    pub fn parse_lossy(value: &str) -> PatternType {
        match value.to_ascii_lowercase().as_str() {
            "database" => Self::Database,
            "rls" => Self::Rls,
            "stripe" => Self::Stripe,
            "deployment" => Self::Deployment,
            _ => Self::Api,
        }
    }
}

/// How an approved fix script is interpreted by the execution collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixType {
    Sql,
    Script,
    ApiCall,
}

impl FixType {
    /// Stable string form, matching the storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sql => "sql",
            Self::Script => "script",
            Self::ApiCall => "api_call",
        }
    }

    /// Parses a fix type, defaulting unknown values to `Script`.
    pub fn parse_lossy(value: &str) -> FixType {
        match value.to_ascii_lowercase().as_str() {
            "sql" => Self::Sql,
            "api_call" => Self::ApiCall,
            _ => Self::Script,
        }
    }
}

/// A learned error pattern, keyed by its deterministic signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPattern {
    pub id: String,
    /// Deterministic fingerprint of the normalized error; the sole dedup key.
    pub pattern_signature: String,
    pub pattern_type: PatternType,
    /// Regex matching future occurrences of this error shape.
    pub error_matcher: String,
    pub error_source: String,
    pub severity: Severity,
    /// Monotonically non-decreasing occurrence counter.
    pub occurrence_count: u64,
    /// Percent of successful applications; derived from records only.
    pub success_rate: f64,
    /// Running [0,1] estimate of how reliable the fix association is.
    pub confidence_score: f64,
    pub auto_fix_enabled: bool,
    pub auto_fix_script: Option<String>,
    pub auto_fix_type: Option<FixType>,
    pub human_approved: bool,
    pub approved_by: Option<String>,
    pub approved_at: Option<i64>,
    /// Incident ids this pattern was learned from, deduplicated.
    pub learned_from_incidents: Vec<String>,
    pub last_seen: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ErrorPattern {
    /// True when auto-fix may run: enabled, human-approved, script present.
    pub fn auto_fix_eligible(&self) -> bool {
        self.auto_fix_enabled && self.human_approved && self.auto_fix_script.is_some()
    }

    /// Checks the hard pattern invariants: enabled implies approved, and
    /// both scores stay in range.
    pub fn invariants_hold(&self) -> bool {
        (!self.auto_fix_enabled || self.human_approved)
            && (0.0..=1.0).contains(&self.confidence_score)
            && (0.0..=100.0).contains(&self.success_rate)
    }
}

/// One fix application. Append-only: records are never updated or deleted,
/// and the pattern's success_rate is recomputed from them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: String,
    pub pattern_id: String,
    pub incident_id: Option<String>,
    pub success: bool,
    pub execution_time_ms: u64,
    /// Snapshot of the script that ran; the pattern's script may change later.
    pub fix_script: Option<String>,
    /// Snapshot of the gate decision for this application.
    pub decision: Option<ComplianceDecision>,
    pub applied_at: i64,
}

/// Aggregate pattern counts for external dashboards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternStatistics {
    pub total_patterns: u64,
    pub auto_fix_enabled: u64,
    pub human_approved: u64,
    /// Mean success rate over patterns with at least one application.
    pub avg_success_rate: f64,
    pub total_applications: u64,
    /// Counts keyed by pattern type string; every type is present.
    pub patterns_by_type: BTreeMap<String, u64>,
}

impl PatternStatistics {
    /// Statistics with all five type buckets zeroed.
    pub fn empty() -> Self {
        let mut by_type = BTreeMap::new();
        for pattern_type in PatternType::all() {
            by_type.insert(pattern_type.as_str().to_string(), 0);
        }
        Self {
            patterns_by_type: by_type,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_parse_lossy_defaults_to_info() {
        assert_eq!(Severity::parse_lossy("critical"), Severity::Critical);
        assert_eq!(Severity::parse_lossy("ERROR"), Severity::Error);
        assert_eq!(Severity::parse_lossy("nonsense"), Severity::Info);
    }

    #[test]
    fn cluster_weight_matches_severity_tiers() {
        assert_eq!(Severity::Critical.cluster_weight(), 5.0);
        assert_eq!(Severity::Error.cluster_weight(), 3.0);
        assert_eq!(Severity::Warning.cluster_weight(), 1.0);
        assert_eq!(Severity::Info.cluster_weight(), 1.0);
    }

    #[test]
    fn pattern_type_round_trips_through_strings() {
        for pattern_type in PatternType::all() {
            assert_eq!(
                PatternType::parse_lossy(pattern_type.as_str()),
                pattern_type
            );
        }
        assert_eq!(PatternType::parse_lossy("unknown"), PatternType::Api);
    }

    #[test]
    fn enabled_without_approval_breaks_invariants() {
        let pattern = ErrorPattern {
            id: "p1".to_string(),
            pattern_signature: "pattern_abc".to_string(),
            pattern_type: PatternType::Database,
            error_matcher: ".*".to_string(),
            error_source: "database".to_string(),
            severity: Severity::Error,
            occurrence_count: 1,
            success_rate: 0.0,
            confidence_score: 0.5,
            auto_fix_enabled: true,
            auto_fix_script: Some("VACUUM;".to_string()),
            auto_fix_type: Some(FixType::Sql),
            human_approved: false,
            approved_by: None,
            approved_at: None,
            learned_from_incidents: vec![],
            last_seen: 0,
            created_at: 0,
            updated_at: 0,
        };
        assert!(!pattern.invariants_hold());
    }

    #[test]
    fn empty_statistics_carry_all_type_buckets() {
        let stats = PatternStatistics::empty();
        assert_eq!(stats.patterns_by_type.len(), 5);
        assert_eq!(stats.patterns_by_type["database"], 0);
        assert_eq!(stats.patterns_by_type["api"], 0);
    }
}
