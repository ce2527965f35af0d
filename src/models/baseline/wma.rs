//! Weighted Moving Average forecaster.

use crate::core::ForecastMethod;
use crate::error::{ReplenishError, Result};
use crate::models::Forecaster;

/// Weighted Moving Average forecaster.
///
/// Predicts demand as the weighted mean of the last `n` periods. Weights are
/// strictly increasing toward the most recent period and normalised to sum
/// to 1. The default weights are linear: for a window of 3 they are
/// `[1/6, 2/6, 3/6]`.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedMovingAverage {
    /// Normalised weights, oldest period first.
    weights: Vec<f64>,
}

impl WeightedMovingAverage {
    /// Create a WMA with linearly increasing weights.
    ///
    /// The window size must be at least 1. If 0 is passed, it will be set to 1.
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        let total = (window * (window + 1) / 2) as f64;
        Self {
            weights: (1..=window).map(|w| w as f64 / total).collect(),
        }
    }

    /// Create a WMA from explicit weights (oldest period first).
    ///
    /// Weights must be positive and strictly increasing; they are normalised.
    pub fn with_weights(weights: &[f64]) -> Result<Self> {
        if weights.is_empty() {
            return Err(ReplenishError::InvalidParameter(
                "WMA needs at least one weight".to_string(),
            ));
        }
        if weights.iter().any(|w| !w.is_finite() || *w <= 0.0) {
            return Err(ReplenishError::InvalidParameter(
                "WMA weights must be positive".to_string(),
            ));
        }
        if weights.windows(2).any(|pair| pair[1] <= pair[0]) {
            return Err(ReplenishError::InvalidParameter(
                "WMA weights must increase toward the most recent period".to_string(),
            ));
        }

        let sum: f64 = weights.iter().sum();
        Ok(Self {
            weights: weights.iter().map(|w| w / sum).collect(),
        })
    }

    /// Get the window size.
    pub fn window(&self) -> usize {
        self.weights.len()
    }

    /// Normalised weights, oldest period first.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

impl Default for WeightedMovingAverage {
    fn default() -> Self {
        Self::new(3)
    }
}

impl Forecaster for WeightedMovingAverage {
    fn method(&self) -> ForecastMethod {
        ForecastMethod::WeightedMovingAverage
    }

    fn min_periods(&self) -> usize {
        self.weights.len()
    }

    fn forecast(&self, history: &[f64], _periods_ahead: usize) -> Result<f64> {
        let window = self.weights.len();
        if history.len() < window {
            return Err(ReplenishError::InsufficientData {
                needed: window,
                got: history.len(),
            });
        }

        let recent = &history[history.len() - window..];
        Ok(recent
            .iter()
            .zip(self.weights.iter())
            .map(|(v, w)| v * w)
            .sum())
    }
}
