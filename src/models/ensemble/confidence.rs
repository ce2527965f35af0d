//! Confidence score for an ensemble forecast.
//!
//! Three parts, scaled to [0, 100]:
//! - data sufficiency, up to 40 points at a full year of periods
//! - agreement between base forecasters, up to 40 points, falling with the
//!   coefficient of variation of their estimates
//! - velocity predictability, up to 20 points
//!
//! Fewer than three periods of history caps the score at 50.

use crate::core::VelocityCategory;
use crate::utils::coefficient_of_variation;

const DATA_POINTS: f64 = 40.0;
const AGREEMENT_POINTS: f64 = 40.0;
const FULL_HISTORY_PERIODS: f64 = 12.0;
const SHORT_HISTORY_PERIODS: usize = 3;
const SHORT_HISTORY_CAP: f64 = 50.0;

/// Points awarded for how predictable a velocity class tends to be.
pub fn velocity_points(velocity: VelocityCategory) -> f64 {
    match velocity {
        VelocityCategory::FastMover => 20.0,
        VelocityCategory::MediumMover => 16.0,
        VelocityCategory::SlowMover => 10.0,
        VelocityCategory::VerySlowMover => 6.0,
    }
}

/// Score a forecast built on `history_periods` periods from `estimates`.
///
/// A single estimate has nothing to agree with and earns half the agreement
/// points.
pub fn confidence_score(
    history_periods: usize,
    estimates: &[f64],
    velocity: VelocityCategory,
) -> f64 {
    let data = (history_periods as f64 / FULL_HISTORY_PERIODS).min(1.0) * DATA_POINTS;

    let agreement = match estimates.len() {
        0 => 0.0,
        1 => AGREEMENT_POINTS / 2.0,
        _ => {
            let cv = coefficient_of_variation(estimates);
            if cv.is_finite() {
                (AGREEMENT_POINTS - AGREEMENT_POINTS * cv).max(0.0)
            } else {
                0.0
            }
        }
    };

    let mut score = data + agreement + velocity_points(velocity);
    if history_periods < SHORT_HISTORY_PERIODS {
        score = score.min(SHORT_HISTORY_CAP);
    }
    score.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn full_history_perfect_agreement_fast_mover() {
        let score = confidence_score(12, &[10.0, 10.0, 10.0], VelocityCategory::FastMover);
        assert_relative_eq!(score, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn data_points_scale_with_history() {
        let half = confidence_score(6, &[5.0, 5.0], VelocityCategory::SlowMover);
        // 20 data + 40 agreement + 10 velocity
        assert_relative_eq!(half, 70.0, epsilon = 1e-9);
    }

    #[test]
    fn disagreement_lowers_the_score() {
        let tight = confidence_score(12, &[10.0, 10.5, 9.5], VelocityCategory::MediumMover);
        let loose = confidence_score(12, &[2.0, 10.0, 25.0], VelocityCategory::MediumMover);
        assert!(tight > loose);
        assert!(loose >= 0.0);
    }

    #[test]
    fn short_history_is_capped() {
        let score = confidence_score(2, &[10.0, 10.0], VelocityCategory::FastMover);
        assert_relative_eq!(score, 50.0, epsilon = 1e-9);
    }

    #[test]
    fn all_zero_estimates_agree() {
        let score = confidence_score(12, &[0.0, 0.0], VelocityCategory::VerySlowMover);
        assert_relative_eq!(score, 86.0, epsilon = 1e-9);
    }

    #[test]
    fn score_stays_in_range() {
        for periods in 0..30 {
            for category in VelocityCategory::ALL {
                let s = confidence_score(periods, &[0.0, 7.0, 100.0], category);
                assert!((0.0..=100.0).contains(&s));
            }
        }
    }
}
