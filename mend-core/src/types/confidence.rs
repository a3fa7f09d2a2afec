//! Success-rate and confidence-trend arithmetic.
//!
//! Both store implementations route every application record through these
//! functions: success_rate is only ever derived from the append-only
//! application history, and confidence moves the same way everywhere.

use crate::constants::{CONFIDENCE_FAILURE_STEP, CONFIDENCE_SUCCESS_STEP};

/// Success rate in percent over an application history.
pub fn success_rate(successes: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (successes as f64 / total as f64) * 100.0
}

/// Moves a confidence score one step for a new application outcome.
///
/// Success raises the score, failure lowers it. Consecutive successes
/// compound slightly so a reliable fix converges faster than an
/// intermittent one. `streak_before` is the trailing success run length
/// before the new outcome. The result is always within [0, 1].
pub fn adjust_confidence(current: f64, success: bool, streak_before: u32) -> f64 {
    let adjusted = if success {
        let streak_bonus = f64::from(streak_before.min(5)) * 0.01;
        current + CONFIDENCE_SUCCESS_STEP + streak_bonus
    } else {
        current - CONFIDENCE_FAILURE_STEP
    };
    adjusted.clamp(0.0, 1.0)
}

/// Length of the trailing success run in application history order.
pub fn trailing_successes(outcomes: &[bool]) -> u32 {
    outcomes.iter().rev().take_while(|success| **success).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_is_percent_of_total() {
        assert_eq!(success_rate(0, 0), 0.0);
        assert_eq!(success_rate(3, 4), 75.0);
        assert_eq!(success_rate(4, 4), 100.0);
    }

    #[test]
    fn success_raises_and_failure_lowers() {
        let up = adjust_confidence(0.5, true, 0);
        assert!(up > 0.5);
        let down = adjust_confidence(0.5, false, 0);
        assert!(down < 0.5);
    }

    #[test]
    fn consecutive_successes_compound() {
        let first = adjust_confidence(0.5, true, 0);
        let second_step = adjust_confidence(first, true, 1) - first;
        let first_step = first - 0.5;
        assert!(second_step > first_step);
    }

    #[test]
    fn confidence_stays_bounded() {
        assert_eq!(adjust_confidence(0.99, true, 5), 1.0);
        assert_eq!(adjust_confidence(0.05, false, 0), 0.0);
    }

    #[test]
    fn trailing_run_counts_from_the_end() {
        assert_eq!(trailing_successes(&[]), 0);
        assert_eq!(trailing_successes(&[true, false, true, true]), 2);
        assert_eq!(trailing_successes(&[false, false]), 0);
        assert_eq!(trailing_successes(&[true, true, true]), 3);
    }
}
