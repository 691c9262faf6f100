//! # Scoring
//!
//! `score = max(0, 100 - errors * error_weight - warnings * warning_weight)`.
//! Weights are integral, so no rounding is needed per stage. The overall
//! score is the unweighted mean of every stage that ran, rounded to two
//! decimals.

use serde::{Deserialize, Serialize};

/// Penalty per finding of each scoring severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub error_weight: u32,
    pub warning_weight: u32,
}

/// Weights plus the minimum score a stage needs to be valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagePolicy {
    pub weights: ScoreWeights,
    pub threshold: u8,
}

impl StagePolicy {
    pub const fn new(error_weight: u32, warning_weight: u32, threshold: u8) -> Self {
        Self {
            weights: ScoreWeights {
                error_weight,
                warning_weight,
            },
            threshold,
        }
    }
}

/// Threshold shared by the built-in stages and the report.
pub const DEFAULT_THRESHOLD: u8 = 70;

pub const STRUCTURAL_POLICY: StagePolicy = StagePolicy::new(10, 2, DEFAULT_THRESHOLD);
pub const CROSS_FORMAT_POLICY: StagePolicy = StagePolicy::new(20, 5, DEFAULT_THRESHOLD);
pub const SECURITY_POLICY: StagePolicy = StagePolicy::new(25, 8, DEFAULT_THRESHOLD);
pub const BEST_PRACTICES_POLICY: StagePolicy = StagePolicy::new(10, 3, DEFAULT_THRESHOLD);

/// Score a stage from its error and warning counts. Floored at 0.
pub fn score(errors: usize, warnings: usize, weights: ScoreWeights) -> u8 {
    let penalty = (errors as u64)
        .saturating_mul(u64::from(weights.error_weight))
        .saturating_add((warnings as u64).saturating_mul(u64::from(weights.warning_weight)));
    // 100 - penalty is in 0..=100, so the narrowing is lossless.
    100u64.saturating_sub(penalty) as u8
}

/// Mean of stage scores rounded to two decimals. Empty input scores 0.
pub fn overall_score(scores: impl IntoIterator<Item = u8>) -> f64 {
    let (sum, count) = scores
        .into_iter()
        .fold((0u64, 0u64), |(sum, count), s| (sum + u64::from(s), count + 1));
    if count == 0 {
        return 0.0;
    }
    let mean = sum as f64 / count as f64;
    (mean * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_score() {
        assert_eq!(score(0, 0, STRUCTURAL_POLICY.weights), 100);
    }

    #[test]
    fn framework_weight_arithmetic() {
        let weights = ScoreWeights {
            error_weight: 15,
            warning_weight: 5,
        };
        assert_eq!(score(2, 3, weights), 55);
    }

    #[test]
    fn security_weights() {
        assert_eq!(score(1, 1, SECURITY_POLICY.weights), 67);
    }

    #[test]
    fn floor_at_zero() {
        assert_eq!(score(50, 50, CROSS_FORMAT_POLICY.weights), 0);
        assert_eq!(score(usize::MAX, usize::MAX, SECURITY_POLICY.weights), 0);
    }

    #[test]
    fn overall_mean_rounds_to_two_decimals() {
        assert_eq!(overall_score([100, 100, 67]), 89.0);
        assert_eq!(overall_score([100, 90, 85]), 91.67);
        assert_eq!(overall_score(Vec::<u8>::new()), 0.0);
    }
}
