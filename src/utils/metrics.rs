//! Accuracy metrics for scoring issued forecasts against realised demand.

use crate::error::{ReplenishError, Result};
use serde::Serialize;

/// Accuracy of a set of forecasts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccuracyMetrics {
    /// Number of (actual, predicted) pairs scored.
    pub count: usize,
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean of (predicted - actual); positive means over-forecasting.
    pub bias: f64,
    /// Mean Absolute Percentage Error (None if zeros in actual)
    pub mape: Option<f64>,
    /// Symmetric Mean Absolute Percentage Error
    pub smape: f64,
}

/// Calculate accuracy metrics between actual and predicted values.
pub fn calculate_metrics(actual: &[f64], predicted: &[f64]) -> Result<AccuracyMetrics> {
    if actual.is_empty() || predicted.is_empty() {
        return Err(ReplenishError::EmptyData);
    }

    if actual.len() != predicted.len() {
        return Err(ReplenishError::InvalidParameter(format!(
            "{} actual values for {} predictions",
            actual.len(),
            predicted.len()
        )));
    }

    let n = actual.len() as f64;
    let pairs = || actual.iter().zip(predicted.iter());

    let mae = pairs().map(|(a, p)| (a - p).abs()).sum::<f64>() / n;
    let mse = pairs().map(|(a, p)| (a - p).powi(2)).sum::<f64>() / n;
    let bias = pairs().map(|(a, p)| p - a).sum::<f64>() / n;

    // MAPE (only if no zeros in actual)
    let mape = if actual.contains(&0.0) {
        None
    } else {
        let sum: f64 = pairs().map(|(a, p)| ((a - p) / a).abs()).sum();
        Some(100.0 * sum / n)
    };

    Ok(AccuracyMetrics {
        count: actual.len(),
        mae,
        mse,
        rmse: mse.sqrt(),
        bias,
        mape,
        smape: smape(actual, predicted),
    })
}

/// Calculate SMAPE between two slices.
pub fn smape(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.len() != predicted.len() || actual.is_empty() {
        return f64::NAN;
    }
    let n = actual.len() as f64;
    actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| {
            let denom = a.abs() + p.abs();
            if denom == 0.0 {
                0.0
            } else {
                2.0 * (a - p).abs() / denom
            }
        })
        .sum::<f64>()
        * 100.0
        / n
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn calculate_metrics_perfect_prediction() {
        let actual = vec![10.0, 20.0, 30.0];
        let metrics = calculate_metrics(&actual, &actual).unwrap();

        assert_eq!(metrics.count, 3);
        assert_relative_eq!(metrics.mae, 0.0, epsilon = 1e-10);
        assert_relative_eq!(metrics.rmse, 0.0, epsilon = 1e-10);
        assert_relative_eq!(metrics.bias, 0.0, epsilon = 1e-10);
        assert_relative_eq!(metrics.smape, 0.0, epsilon = 1e-10);
        assert_relative_eq!(metrics.mape.unwrap(), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn calculate_metrics_known_values() {
        let actual = vec![10.0, 20.0, 30.0, 40.0];
        let predicted = vec![12.0, 18.0, 32.0, 42.0];

        let metrics = calculate_metrics(&actual, &predicted).unwrap();

        assert_relative_eq!(metrics.mae, 2.0, epsilon = 1e-10);
        assert_relative_eq!(metrics.mse, 4.0, epsilon = 1e-10);
        assert_relative_eq!(metrics.rmse, 2.0, epsilon = 1e-10);
        // +2, -2, +2, +2
        assert_relative_eq!(metrics.bias, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn calculate_metrics_mape_with_zeros() {
        let metrics = calculate_metrics(&[0.0, 4.0], &[1.0, 4.0]).unwrap();
        assert!(metrics.mape.is_none());
        assert!(metrics.smape.is_finite());
    }

    #[test]
    fn calculate_metrics_rejects_mismatch_and_empty() {
        assert!(matches!(
            calculate_metrics(&[1.0, 2.0], &[1.0]),
            Err(ReplenishError::InvalidParameter(_))
        ));
        assert!(matches!(
            calculate_metrics(&[], &[]),
            Err(ReplenishError::EmptyData)
        ));
    }
}
