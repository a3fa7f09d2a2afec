//! Keyword-based pattern type classification.
//!
//! Tiers are checked in a fixed order; the first tier with a hit wins.
//! Matching is case-insensitive substring search, which keeps behavior
//! stable for messages like "PERMISSION DENIED" or "PostgresError".

use std::sync::LazyLock;

use aho_corasick::AhoCorasick;
use mend_core::types::PatternType;

fn keyword_set(words: &[&str]) -> Option<AhoCorasick> {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(words)
        .ok()
}

static RLS_KEYWORDS: LazyLock<Option<AhoCorasick>> =
    LazyLock::new(|| keyword_set(&["policy", "rls", "permission"]));

static STRIPE_KEYWORDS: LazyLock<Option<AhoCorasick>> = LazyLock::new(|| keyword_set(&["stripe"]));

static DEPLOYMENT_KEYWORDS: LazyLock<Option<AhoCorasick>> =
    LazyLock::new(|| keyword_set(&["deploy", "build", "migration"]));

static DATABASE_KEYWORDS: LazyLock<Option<AhoCorasick>> = LazyLock::new(|| {
    keyword_set(&["select", "insert", "update", "delete", "postgres", "database", "sql"])
});

fn hits(set: &LazyLock<Option<AhoCorasick>>, text: &str) -> bool {
    set.as_ref().is_some_and(|ac| ac.is_match(text))
}

/// Classifies an error into its pattern type from message and source.
///
/// Stripe and database tiers also consider the source component, so a
/// bare "payment failed" from the stripe webhook still lands in the
/// stripe bucket.
pub fn classify_pattern_type(message: &str, source: &str) -> PatternType {
    if hits(&RLS_KEYWORDS, message) {
        return PatternType::Rls;
    }
    if hits(&STRIPE_KEYWORDS, message) || hits(&STRIPE_KEYWORDS, source) {
        return PatternType::Stripe;
    }
    if hits(&DEPLOYMENT_KEYWORDS, message) {
        return PatternType::Deployment;
    }
    if hits(&DATABASE_KEYWORDS, message) || hits(&DATABASE_KEYWORDS, source) {
        return PatternType::Database;
    }
    PatternType::Api
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rls_tier_wins_over_later_tiers() {
        assert_eq!(classify_pattern_type("permission denied", "auth"), PatternType::Rls);
        assert_eq!(
            classify_pattern_type("RLS policy rejected the SELECT", "database"),
            PatternType::Rls
        );
    }

    #[test]
    fn stripe_matches_message_or_source() {
        assert_eq!(classify_pattern_type("Stripe charge declined", "api"), PatternType::Stripe);
        assert_eq!(classify_pattern_type("payment failed", "stripe"), PatternType::Stripe);
    }

    #[test]
    fn deployment_keywords() {
        assert_eq!(classify_pattern_type("deploy step timed out", "ci"), PatternType::Deployment);
        assert_eq!(classify_pattern_type("migration 042 failed", "ci"), PatternType::Deployment);
    }

    #[test]
    fn database_matches_message_or_source() {
        assert_eq!(classify_pattern_type("SELECT failed", "query"), PatternType::Database);
        assert_eq!(
            classify_pattern_type("Database connection failed on port 5432", "database"),
            PatternType::Database
        );
        assert_eq!(classify_pattern_type("connection refused", "postgres"), PatternType::Database);
    }

    #[test]
    fn everything_else_is_api() {
        assert_eq!(classify_pattern_type("request timeout", "gateway"), PatternType::Api);
    }
}
