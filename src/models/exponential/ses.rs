//! Simple Exponential Smoothing (SES) forecaster.
//!
//! SES is suitable for demand with no clear trend or seasonality.

use crate::core::ForecastMethod;
use crate::error::{ReplenishError, Result};
use crate::models::Forecaster;

/// Simple Exponential Smoothing forecaster.
///
/// The model equation is:
/// `level_t = α × y_t + (1-α) × level_{t-1}`
///
/// where α (alpha) is the smoothing parameter (0 < α ≤ 1). The initial level
/// is the first observation and the forecast is the level after the last
/// period. Higher α reacts faster (fast movers), lower α is more stable.
///
/// # Example
/// ```
/// use anofox_replenish::models::exponential::SimpleExponentialSmoothing;
/// use anofox_replenish::models::Forecaster;
///
/// let model = SimpleExponentialSmoothing::new(0.5);
/// let value = model.forecast(&[10.0, 20.0], 1).unwrap();
/// assert_eq!(value, 15.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimpleExponentialSmoothing {
    alpha: f64,
}

impl SimpleExponentialSmoothing {
    /// Create a new SES model with a fixed smoothing parameter.
    ///
    /// # Arguments
    /// * `alpha` - Smoothing parameter, clamped into (0, 1]
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha: alpha.clamp(0.0001, 1.0),
        }
    }

    /// Get the smoothing parameter.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Level after each period, starting from the first observation.
    pub fn levels(&self, history: &[f64]) -> Vec<f64> {
        let mut levels = Vec::with_capacity(history.len());
        let mut level = match history.first() {
            Some(&first) => first,
            None => return levels,
        };
        levels.push(level);
        for &y in &history[1..] {
            level = self.alpha * y + (1.0 - self.alpha) * level;
            levels.push(level);
        }
        levels
    }
}

impl Default for SimpleExponentialSmoothing {
    fn default() -> Self {
        Self::new(0.3)
    }
}

impl Forecaster for SimpleExponentialSmoothing {
    fn method(&self) -> ForecastMethod {
        ForecastMethod::ExponentialSmoothing
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn forecast(&self, history: &[f64], _periods_ahead: usize) -> Result<f64> {
        self.levels(history)
            .last()
            .copied()
            .ok_or(ReplenishError::InsufficientData {
                needed: 1,
                got: 0,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ses_single_observation_is_the_level() {
        let model = SimpleExponentialSmoothing::new(0.3);
        assert_relative_eq!(model.forecast(&[7.0], 1).unwrap(), 7.0);
    }

    #[test]
    fn ses_known_recursion() {
        let model = SimpleExponentialSmoothing::new(0.3);
        // l0 = 10; l1 = 0.3*20 + 0.7*10 = 13; l2 = 0.3*10 + 0.7*13 = 12.1
        let value = model.forecast(&[10.0, 20.0, 10.0], 1).unwrap();
        assert_relative_eq!(value, 12.1, epsilon = 1e-10);
    }

    #[test]
    fn ses_alpha_one_tracks_last_value() {
        let model = SimpleExponentialSmoothing::new(1.0);
        assert_relative_eq!(model.forecast(&[3.0, 9.0, 4.0], 1).unwrap(), 4.0);
    }

    #[test]
    fn ses_higher_alpha_reacts_faster() {
        let history = [10.0, 10.0, 10.0, 30.0];
        let fast = SimpleExponentialSmoothing::new(0.6).forecast(&history, 1).unwrap();
        let slow = SimpleExponentialSmoothing::new(0.1).forecast(&history, 1).unwrap();
        assert!(fast > slow);
    }

    #[test]
    fn ses_alpha_is_clamped() {
        assert_eq!(SimpleExponentialSmoothing::new(1.5).alpha(), 1.0);
        assert!(SimpleExponentialSmoothing::new(0.0).alpha() > 0.0);
    }

    #[test]
    fn ses_levels_length_matches_history() {
        let model = SimpleExponentialSmoothing::default();
        assert_eq!(model.levels(&[1.0, 2.0, 3.0]).len(), 3);
        assert!(model.levels(&[]).is_empty());
    }
}
