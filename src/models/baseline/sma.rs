//! Simple Moving Average forecaster.

use crate::core::ForecastMethod;
use crate::error::{ReplenishError, Result};
use crate::models::Forecaster;

/// Simple Moving Average forecaster.
///
/// Predicts demand as the mean of the last `window` periods. Fails with
/// `InsufficientData` when fewer than `window` periods exist; the caller
/// decides the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleMovingAverage {
    window: usize,
}

impl SimpleMovingAverage {
    /// Create a new SMA with the given window size.
    ///
    /// The window size must be at least 1. If 0 is passed, it will be set to 1.
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
        }
    }

    /// Get the window size.
    pub fn window(&self) -> usize {
        self.window
    }
}

impl Default for SimpleMovingAverage {
    fn default() -> Self {
        Self::new(3)
    }
}

impl Forecaster for SimpleMovingAverage {
    fn method(&self) -> ForecastMethod {
        ForecastMethod::SimpleMovingAverage
    }

    fn min_periods(&self) -> usize {
        self.window
    }

    fn forecast(&self, history: &[f64], _periods_ahead: usize) -> Result<f64> {
        if history.len() < self.window {
            return Err(ReplenishError::InsufficientData {
                needed: self.window,
                got: history.len(),
            });
        }

        let recent = &history[history.len() - self.window..];
        Ok(recent.iter().sum::<f64>() / self.window as f64)
    }
}
