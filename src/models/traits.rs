//! Forecaster trait defining the common interface for the base methods.

use crate::core::ForecastMethod;
use crate::error::Result;

/// Common interface for the single-method demand predictors.
///
/// Forecasters are stateless: every call works from the history slice it is
/// given, oldest period first. They return a raw per-period estimate and never
/// apply seasonality themselves.
///
/// This trait is object-safe and can be used with `Box<dyn Forecaster>`.
pub trait Forecaster: Send + Sync {
    /// Identifier reported alongside the estimate.
    fn method(&self) -> ForecastMethod;

    /// Minimum number of periods needed to produce a value.
    fn min_periods(&self) -> usize;

    /// Per-period demand estimate, averaged over `periods_ahead` steps.
    ///
    /// Returns `InsufficientData` when the history is shorter than
    /// [`min_periods`](Forecaster::min_periods).
    fn forecast(&self, history: &[f64], periods_ahead: usize) -> Result<f64>;

    /// Get the model name.
    fn name(&self) -> &str {
        self.method().name()
    }
}

/// Type alias for boxed forecaster trait objects.
///
/// # Example
///
/// ```
/// use anofox_replenish::models::{BoxedForecaster, Forecaster};
/// use anofox_replenish::models::baseline::SimpleMovingAverage;
///
/// let model: BoxedForecaster = Box::new(SimpleMovingAverage::new(3));
/// assert_eq!(model.name(), "SimpleMovingAverage");
/// ```
pub type BoxedForecaster = Box<dyn Forecaster>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReplenishError;
    use crate::models::baseline::{SimpleMovingAverage, WeightedMovingAverage};
    use crate::models::exponential::{HoltLinearTrend, SimpleExponentialSmoothing};

    fn all_models() -> Vec<BoxedForecaster> {
        vec![
            Box::new(SimpleMovingAverage::new(3)),
            Box::new(WeightedMovingAverage::new(3)),
            Box::new(SimpleExponentialSmoothing::new(0.3)),
            Box::new(HoltLinearTrend::new(0.3, 0.1)),
        ]
    }

    #[test]
    fn boxed_forecasters_report_their_method() {
        let methods: Vec<_> = all_models().iter().map(|m| m.method()).collect();
        assert_eq!(methods, ForecastMethod::ALL.to_vec());
    }

    #[test]
    fn every_model_fails_on_empty_history() {
        for model in all_models() {
            assert!(matches!(
                model.forecast(&[], 1),
                Err(ReplenishError::InsufficientData { got: 0, .. })
            ));
        }
    }

    #[test]
    fn every_model_handles_flat_history() {
        let history = [5.0; 8];
        for model in all_models() {
            let value = model.forecast(&history, 1).unwrap();
            assert!((value - 5.0).abs() < 1e-9, "{} gave {}", model.name(), value);
        }
    }
}
