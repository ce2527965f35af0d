//! Holt's Linear Trend forecaster.
//!
//! Also known as double exponential smoothing, this model is suitable for
//! demand with a steady rise or decline but no seasonality.

use crate::core::ForecastMethod;
use crate::error::{ReplenishError, Result};
use crate::models::Forecaster;

/// Holt's Linear Trend forecaster.
///
/// The model equations are:
/// - Level: `l_t = α × y_t + (1-α) × (l_{t-1} + b_{t-1})`
/// - Trend: `b_t = β × (l_t - l_{t-1}) + (1-β) × b_{t-1}`
/// - Forecast: `ŷ_{t+k} = l_t + k × b_t`
///
/// The state starts from the first observation and the first difference.
/// The per-period estimate over `k` steps is the mean of the 1..=k step
/// forecasts, floored at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoltLinearTrend {
    /// Level smoothing parameter (0 < alpha <= 1).
    alpha: f64,
    /// Trend smoothing parameter (0 < beta <= 1).
    beta: f64,
}

impl HoltLinearTrend {
    /// Create a new Holt model with fixed parameters.
    ///
    /// # Arguments
    /// * `alpha` - Level smoothing parameter, clamped into (0, 1]
    /// * `beta` - Trend smoothing parameter, clamped into (0, 1]
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self {
            alpha: alpha.clamp(0.0001, 1.0),
            beta: beta.clamp(0.0001, 1.0),
        }
    }

    /// Get the level smoothing parameter.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Get the trend smoothing parameter.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Final (level, trend) state after running over the history.
    pub fn state(&self, history: &[f64]) -> Result<(f64, f64)> {
        if history.len() < 2 {
            return Err(ReplenishError::InsufficientData {
                needed: 2,
                got: history.len(),
            });
        }

        let mut l = history[0];
        let mut b = history[1] - history[0];

        for &y in &history[1..] {
            let l_prev = l;
            l = self.alpha * y + (1.0 - self.alpha) * (l_prev + b);
            b = self.beta * (l - l_prev) + (1.0 - self.beta) * b;
        }

        Ok((l, b))
    }

    /// Point forecast `k` periods past the end of the history.
    pub fn step_ahead(&self, history: &[f64], k: usize) -> Result<f64> {
        let (l, b) = self.state(history)?;
        Ok(l + k as f64 * b)
    }
}

impl Default for HoltLinearTrend {
    fn default() -> Self {
        Self::new(0.3, 0.1)
    }
}

impl Forecaster for HoltLinearTrend {
    fn method(&self) -> ForecastMethod {
        ForecastMethod::HoltLinearTrend
    }

    fn min_periods(&self) -> usize {
        2
    }

    fn forecast(&self, history: &[f64], periods_ahead: usize) -> Result<f64> {
        let (l, b) = self.state(history)?;
        let k = periods_ahead.max(1) as f64;
        // mean of l + i*b for i in 1..=k
        Ok((l + b * (k + 1.0) / 2.0).max(0.0))
    }
}
