//! Velocity-weighted ensemble of the base forecasters.
//!
//! Each member produces a raw per-period estimate. Members that cannot
//! (too little history, or Holt without a trend) drop out and the remaining
//! weights are renormalised to sum to 1.

use crate::config::{ForecastingConfig, MethodWeights, VelocityParams};
use crate::core::{ForecastMethod, MethodContribution};
use crate::error::{ReplenishError, Result};
use crate::features::TrendTest;
use crate::models::baseline::{SimpleMovingAverage, WeightedMovingAverage};
use crate::models::exponential::{HoltLinearTrend, SimpleExponentialSmoothing};
use crate::models::BoxedForecaster;
use tracing::debug;

/// Renormalise `weights` over the methods that produced a value.
///
/// Returns one weight per entry of `available`, summing to 1. When every
/// available method carries zero weight they share equally. Returns `None`
/// when nothing is available.
pub fn renormalize(weights: &MethodWeights, available: &[ForecastMethod]) -> Option<Vec<f64>> {
    if available.is_empty() {
        return None;
    }

    let raw: Vec<f64> = available.iter().map(|m| weights.get(*m).max(0.0)).collect();
    let total: f64 = raw.iter().sum();

    if total > 0.0 {
        Some(raw.iter().map(|w| w / total).collect())
    } else {
        let n = available.len() as f64;
        Some(vec![1.0 / n; available.len()])
    }
}

/// Combined estimate plus the per-method breakdown behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleOutput {
    /// Weighted per-period estimate, before seasonality.
    pub base_per_period: f64,
    pub contributions: Vec<MethodContribution>,
}

impl EnsembleOutput {
    /// Estimates of the methods that made it into the weighted sum.
    pub fn estimates(&self) -> Vec<f64> {
        self.contributions
            .iter()
            .filter(|c| c.is_used())
            .filter_map(|c| c.estimate)
            .collect()
    }
}

/// Ensemble forecaster with a fixed weight per method.
pub struct Ensemble {
    members: Vec<BoxedForecaster>,
    weights: MethodWeights,
    trend_test: TrendTest,
}

impl Ensemble {
    /// Create an empty ensemble with the given weights.
    pub fn new(weights: MethodWeights) -> Self {
        Self {
            members: Vec::new(),
            weights,
            trend_test: TrendTest::default(),
        }
    }

    /// Add a member model.
    pub fn with_member(mut self, model: BoxedForecaster) -> Self {
        self.members.push(model);
        self
    }

    /// Set the trend test that gates Holt's method.
    pub fn with_trend_test(mut self, test: TrendTest) -> Self {
        self.trend_test = test;
        self
    }

    /// The four base methods configured for one velocity class.
    pub fn for_velocity(params: &VelocityParams, forecasting: &ForecastingConfig) -> Self {
        Self::new(params.weights)
            .with_member(Box::new(SimpleMovingAverage::new(forecasting.sma_window)))
            .with_member(Box::new(WeightedMovingAverage::new(forecasting.wma_window)))
            .with_member(Box::new(SimpleExponentialSmoothing::new(params.alpha)))
            .with_member(Box::new(HoltLinearTrend::new(params.alpha, params.beta)))
            .with_trend_test(TrendTest::new(
                forecasting.trend_window,
                forecasting.min_trend_strength,
            ))
    }

    pub fn weights(&self) -> &MethodWeights {
        &self.weights
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Run every member on `history` and blend the results.
    ///
    /// Fails with `InsufficientData` only when no member produced a value.
    pub fn combine(&self, history: &[f64], periods_ahead: usize) -> Result<EnsembleOutput> {
        let mut contributions = Vec::with_capacity(self.members.len());

        for model in &self.members {
            let method = model.method();
            let outcome = if method == ForecastMethod::HoltLinearTrend
                && !self.trend_test.passes(history)
            {
                Err("no monotonic trend".to_string())
            } else {
                match model.forecast(history, periods_ahead) {
                    Ok(value) => Ok(value),
                    Err(ReplenishError::InsufficientData { needed, got }) => Err(format!(
                        "insufficient data: needed {needed} periods, got {got}"
                    )),
                    Err(e) => return Err(e),
                }
            };

            let contribution = match outcome {
                Ok(value) => MethodContribution {
                    method,
                    estimate: Some(value),
                    weight: 0.0,
                    skipped: None,
                },
                Err(reason) => {
                    debug!(%method, %reason, "forecaster skipped");
                    MethodContribution {
                        method,
                        estimate: None,
                        weight: 0.0,
                        skipped: Some(reason),
                    }
                }
            };
            contributions.push(contribution);
        }

        let available: Vec<ForecastMethod> = contributions
            .iter()
            .filter(|c| c.estimate.is_some())
            .map(|c| c.method)
            .collect();

        let weights = renormalize(&self.weights, &available).ok_or_else(|| {
            ReplenishError::InsufficientData {
                needed: self
                    .members
                    .iter()
                    .map(|m| m.min_periods())
                    .min()
                    .unwrap_or(1),
                got: history.len(),
            }
        })?;

        let mut base = 0.0;
        let mut next = weights.iter();
        for c in contributions.iter_mut() {
            if let Some(value) = c.estimate {
                c.weight = next.next().copied().unwrap_or(0.0);
                base += c.weight * value;
            }
        }

        Ok(EnsembleOutput {
            base_per_period: base.max(0.0),
            contributions,
        })
    }
}
