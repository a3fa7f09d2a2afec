//! Property-based tests for the pipeline's mathematical invariants.
//!
//! Uses proptest to fuzz-verify:
//!   - signature shape and stability under identifier noise
//!   - normalization idempotence and output hygiene
//!   - confidence and success-rate bounds and monotonicity
//!   - k-means assignment totality and determinism
//!   - compliance decisions staying internally consistent
//!
//! Tests prefixed `regression_gate_` guard invariants the stores and
//! orchestrators rely on. Run in isolation with:
//! `cargo test regression_gate_`

use proptest::prelude::*;

use mend_core::types::confidence::{adjust_confidence, success_rate, trailing_successes};
use mend_engine::clustering::{cluster_count, kmeans};
use mend_engine::compliance::{ActionDescriptor, ComplianceGate, GateContext};
use mend_engine::features::extract_features;
use mend_engine::signature::{normalize_message, signature_for};
use uuid::Uuid;

// ═══════════════════════════════════════════════════════════════════
// Signature Properties
// ═══════════════════════════════════════════════════════════════════

proptest! {
    /// REGRESSION GATE: every signature is `pattern_` plus exactly 16
    /// lowercase hex digits, whatever the input looks like.
    #[test]
    fn regression_gate_signature_shape(message in "\\PC{0,200}", source in "[a-z-]{1,24}") {
        let signature = signature_for(&message, &source);
        let hex = signature.strip_prefix("pattern_");
        prop_assert!(hex.is_some(), "missing prefix in {}", signature);
        let hex = hex.unwrap();
        prop_assert_eq!(hex.len(), 16, "bad hex length in {}", &signature);
        prop_assert!(
            hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()),
            "non-hex or uppercase characters in {}",
            signature
        );
    }

    /// REGRESSION GATE: recomputing a signature never changes it. The
    /// store's dedup key depends on this.
    #[test]
    fn regression_gate_signature_deterministic(message in "\\PC{0,200}", source in "[a-z-]{1,24}") {
        prop_assert_eq!(
            signature_for(&message, &source),
            signature_for(&message, &source)
        );
    }

    /// Messages differing only in embedded digit runs collapse to the
    /// same signature.
    #[test]
    fn prop_digit_runs_never_change_the_signature(
        prefix in "[a-z ]{5,40}",
        a in 0u64..1_000_000,
        b in 0u64..1_000_000,
    ) {
        prop_assert_eq!(
            signature_for(&format!("{prefix} code {a}"), "api"),
            signature_for(&format!("{prefix} code {b}"), "api")
        );
    }

    /// Messages differing only in an embedded UUID collapse to the same
    /// signature.
    #[test]
    fn prop_uuid_literals_never_change_the_signature(raw_a in any::<u128>(), raw_b in any::<u128>()) {
        let a = Uuid::from_u128(raw_a);
        let b = Uuid::from_u128(raw_b);
        prop_assert_eq!(
            signature_for(&format!("user {a} not found"), "auth"),
            signature_for(&format!("user {b} not found"), "auth")
        );
    }

    /// The source component is part of pattern identity.
    #[test]
    fn prop_source_is_part_of_identity(
        message in "\\PC{1,100}",
        a in "[a-z]{1,12}",
        b in "[a-z]{1,12}",
    ) {
        prop_assume!(a != b);
        prop_assert_ne!(signature_for(&message, &a), signature_for(&message, &b));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Normalization Properties
// ═══════════════════════════════════════════════════════════════════

proptest! {
    /// REGRESSION GATE: normalization is idempotent. Placeholder tokens
    /// contain nothing the rewrite passes match, so a second pass is a
    /// no-op.
    #[test]
    fn regression_gate_normalization_idempotent(message in "\\PC{0,300}") {
        let once = normalize_message(&message);
        let twice = normalize_message(&once);
        prop_assert_eq!(twice, once);
    }

    /// The normal form is always trimmed and free of uppercase ASCII.
    #[test]
    fn prop_normal_form_is_trimmed_and_lowercased(message in "\\PC{0,300}") {
        let normalized = normalize_message(&message);
        prop_assert_eq!(normalized.trim(), normalized.as_str());
        prop_assert!(!normalized.chars().any(|c| c.is_ascii_uppercase()));
    }

    /// Extracted severity always lands on one of the four tiers.
    #[test]
    fn prop_severity_score_lands_on_a_tier(message in "\\PC{0,200}") {
        let features = extract_features(&message, "api");
        prop_assert!(
            matches!(features.severity_score, 1 | 2 | 3 | 5),
            "unexpected severity score {}",
            features.severity_score
        );
    }
}

// ═══════════════════════════════════════════════════════════════════
// Confidence Properties
// ═══════════════════════════════════════════════════════════════════

proptest! {
    /// REGRESSION GATE: confidence stays in [0.0, 1.0] for any starting
    /// point, outcome, and streak length.
    #[test]
    fn regression_gate_confidence_bounded(
        current in 0.0f64..=1.0,
        success in any::<bool>(),
        streak in 0u32..200,
    ) {
        let next = adjust_confidence(current, success, streak);
        prop_assert!(
            (0.0..=1.0).contains(&next),
            "confidence {} escaped its bounds (from {}, success={}, streak={})",
            next, current, success, streak
        );
    }

    /// A success never lowers confidence.
    #[test]
    fn prop_success_never_lowers_confidence(current in 0.0f64..=1.0, streak in 0u32..200) {
        prop_assert!(adjust_confidence(current, true, streak) >= current);
    }

    /// A failure never raises confidence.
    #[test]
    fn prop_failure_never_raises_confidence(current in 0.0f64..=1.0) {
        prop_assert!(adjust_confidence(current, false, 0) <= current);
    }

    /// The streak bonus stops compounding beyond five consecutive
    /// successes.
    #[test]
    fn prop_streak_bonus_caps_at_five(current in 0.0f64..=1.0, streak in 5u32..500) {
        prop_assert_eq!(
            adjust_confidence(current, true, streak),
            adjust_confidence(current, true, 5)
        );
    }

    /// REGRESSION GATE: success rate is a percentage in [0.0, 100.0],
    /// and an all-success history reads as exactly 100.
    #[test]
    fn regression_gate_success_rate_is_a_percentage(
        successes in 0u64..10_000,
        failures in 0u64..10_000,
    ) {
        let rate = success_rate(successes, successes + failures);
        prop_assert!((0.0..=100.0).contains(&rate), "rate {} out of range", rate);
        if successes > 0 && failures == 0 {
            prop_assert_eq!(rate, 100.0);
        }
    }

    /// The trailing-success run is a suffix of the history: every counted
    /// outcome succeeded, and the outcome before the run (if any) failed.
    #[test]
    fn prop_trailing_successes_counts_the_tail(
        outcomes in prop::collection::vec(any::<bool>(), 0..64),
    ) {
        let run = trailing_successes(&outcomes) as usize;
        prop_assert!(run <= outcomes.len());
        prop_assert!(outcomes.iter().rev().take(run).all(|&success| success));
        if run < outcomes.len() {
            prop_assert!(!outcomes[outcomes.len() - run - 1]);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// Clustering Properties
// ═══════════════════════════════════════════════════════════════════

fn feature_vectors(raw: &[(f64, f64, f64, f64)]) -> Vec<Vec<f64>> {
    raw.iter().map(|&(a, b, c, d)| vec![a, b, c, d]).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// REGRESSION GATE: the cluster count stays within [1, 5], never
    /// exceeds the population, and reaches 2 once six patterns exist.
    #[test]
    fn regression_gate_cluster_count_bounds(n in 1usize..100_000) {
        let k = cluster_count(n);
        prop_assert!(k >= 1, "k = 0 for n = {}", n);
        prop_assert!(k <= 5, "k = {} exceeds the cap for n = {}", k, n);
        prop_assert!(k <= n, "k = {} exceeds n = {}", k, n);
        if n >= 6 {
            prop_assert!(k >= 2);
        }
    }

    /// REGRESSION GATE: every vector is assigned to exactly one valid
    /// cluster and the centroid count matches k.
    #[test]
    fn regression_gate_kmeans_assigns_every_vector(
        raw in prop::collection::vec(
            (0.0f64..500.0, 0.0f64..100.0, 0.0f64..100.0, 1.0f64..5.0),
            1..60,
        ),
    ) {
        let vectors = feature_vectors(&raw);
        let k = cluster_count(vectors.len());
        let result = kmeans(&vectors, k, 10);
        prop_assert_eq!(result.assignments.len(), vectors.len());
        prop_assert!(result.assignments.iter().all(|&cluster| cluster < k));
        prop_assert_eq!(result.centroids.len(), k);
    }

    /// Two runs over the same snapshot produce identical clusters; the
    /// deterministic seeding makes reruns reproducible.
    #[test]
    fn prop_kmeans_is_deterministic(
        raw in prop::collection::vec(
            (0.0f64..500.0, 0.0f64..100.0, 0.0f64..100.0, 1.0f64..5.0),
            2..40,
        ),
    ) {
        let vectors = feature_vectors(&raw);
        let k = cluster_count(vectors.len());
        let first = kmeans(&vectors, k, 10);
        let second = kmeans(&vectors, k, 10);
        prop_assert_eq!(first.assignments, second.assignments);
        prop_assert_eq!(first.centroids, second.centroids);
    }

    /// Identical vectors always land in a single cluster; equal distances
    /// tie-break toward the lowest index.
    #[test]
    fn prop_identical_vectors_share_one_cluster(
        point in (0.0f64..100.0, 0.0f64..100.0, 0.0f64..100.0, 1.0f64..5.0),
        n in 6usize..40,
    ) {
        let vectors: Vec<Vec<f64>> = (0..n)
            .map(|_| vec![point.0, point.1, point.2, point.3])
            .collect();
        let result = kmeans(&vectors, cluster_count(n), 10);
        prop_assert!(result.assignments.iter().all(|&cluster| cluster == 0));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Compliance Gate Properties
// ═══════════════════════════════════════════════════════════════════

proptest! {
    /// REGRESSION GATE: a decision is internally consistent. `allowed`
    /// mirrors the violation list, a denial always explains itself, and
    /// nonzero risk or added disorder is denied no matter the context.
    #[test]
    fn regression_gate_decision_is_internally_consistent(
        risk in prop::option::of(0.01f64..1.0),
        added_entropy in prop::option::of(0.01f64..0.5),
        system_entropy in 0.0f64..2.0,
    ) {
        let mut action = ActionDescriptor::remediation("pattern_f00d");
        if let Some(risk) = risk {
            action.risk_to_life = risk;
        }
        if let Some(added) = added_entropy {
            action.entropy_increase = added;
        }
        let decision = ComplianceGate::evaluate(&action, &GateContext::new(system_entropy));

        prop_assert_eq!(decision.allowed, decision.violations.is_empty());
        prop_assert_eq!(decision.denial_reason().is_some(), !decision.allowed);
        prop_assert_eq!(decision.allowed, risk.is_none() && added_entropy.is_none());
        // The profile match is independent of the risk fields.
        prop_assert_eq!(decision.matched_profile.as_deref(), Some("auto-remediation"));
    }

    /// System entropy warns but never denies a clean whitelisted action.
    #[test]
    fn prop_entropy_never_denies_a_clean_action(system_entropy in 0.0f64..10.0) {
        let action = ActionDescriptor::rollback("threshold breach");
        let decision = ComplianceGate::evaluate(&action, &GateContext::new(system_entropy));
        prop_assert!(decision.allowed);
        prop_assert_eq!(decision.warnings.is_empty(), system_entropy <= 0.1);
    }
}
