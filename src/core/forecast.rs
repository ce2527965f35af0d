//! Forecast results produced by the ensemble.

use crate::core::product::{ProductId, StoreId, VelocityCategory};
use crate::error::{ReplenishError, Result};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a base forecasting method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    SimpleMovingAverage,
    WeightedMovingAverage,
    ExponentialSmoothing,
    HoltLinearTrend,
}

impl ForecastMethod {
    pub const ALL: [ForecastMethod; 4] = [
        ForecastMethod::SimpleMovingAverage,
        ForecastMethod::WeightedMovingAverage,
        ForecastMethod::ExponentialSmoothing,
        ForecastMethod::HoltLinearTrend,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ForecastMethod::SimpleMovingAverage => "SimpleMovingAverage",
            ForecastMethod::WeightedMovingAverage => "WeightedMovingAverage",
            ForecastMethod::ExponentialSmoothing => "ExponentialSmoothing",
            ForecastMethod::HoltLinearTrend => "HoltLinearTrend",
        }
    }
}

impl fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A run of consecutive days starting at `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Horizon {
    pub start: NaiveDate,
    pub days: u32,
}

impl Horizon {
    pub fn new(start: NaiveDate, days: u32) -> Result<Self> {
        if days == 0 {
            return Err(ReplenishError::InvalidParameter(
                "horizon must span at least one day".to_string(),
            ));
        }
        Ok(Self { start, days })
    }

    /// First day after the horizon.
    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(i64::from(self.days))
    }

    /// Calendar months covered by the horizon with the fraction of days in each.
    ///
    /// Fractions sum to 1. A month appears once per contiguous stretch, so a
    /// horizon longer than a year can list the same month twice.
    pub fn month_fractions(&self) -> Vec<(u32, f64)> {
        let end = self.end();
        let total = f64::from(self.days);
        let mut parts = Vec::new();
        let mut cursor = self.start;

        while cursor < end {
            let month_start = cursor - Duration::days(i64::from(cursor.day0()));
            let next_month = month_start
                .checked_add_months(chrono::Months::new(1))
                .unwrap_or(end);
            let stop = next_month.min(end);
            let days = (stop - cursor).num_days() as f64;
            parts.push((cursor.month(), days / total));
            cursor = stop;
        }

        parts
    }
}

/// How one base forecaster fed into an ensemble prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodContribution {
    pub method: ForecastMethod,
    /// Raw per-period estimate, `None` when the method was skipped.
    pub estimate: Option<f64>,
    /// Renormalised weight (0 when skipped).
    pub weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<String>,
}

impl MethodContribution {
    pub fn is_used(&self) -> bool {
        self.estimate.is_some() && self.weight > 0.0
    }
}

/// Demand prediction for one (store, product) over a horizon.
///
/// Produced fresh on every run; later runs supersede rather than mutate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub store_id: StoreId,
    pub product_id: ProductId,
    pub forecast_date: NaiveDate,
    pub horizon: Horizon,
    pub velocity: VelocityCategory,
    /// De-seasonalised weighted estimate per period.
    pub base_per_period: f64,
    /// Horizon-prorated seasonal multiplier.
    pub seasonal_factor: f64,
    /// Seasonally adjusted demand per day.
    pub daily_demand: f64,
    /// Whole units expected over the horizon.
    pub predicted_demand: u64,
    /// Confidence in [0, 100].
    pub confidence_score: f64,
    /// Number of history periods the forecast was built on.
    pub history_periods: usize,
    pub contributions: Vec<MethodContribution>,
}

impl ForecastResult {
    /// Methods that contributed a value to the weighted sum.
    pub fn contributing_methods(&self) -> Vec<ForecastMethod> {
        self.contributions
            .iter()
            .filter(|c| c.is_used())
            .map(|c| c.method)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn horizon_rejects_zero_days() {
        assert!(Horizon::new(date(2024, 7, 1), 0).is_err());
    }

    #[test]
    fn horizon_within_one_month() {
        let h = Horizon::new(date(2024, 7, 1), 10).unwrap();
        assert_eq!(h.end(), date(2024, 7, 11));
        assert_eq!(h.month_fractions(), vec![(7, 1.0)]);
    }

    #[test]
    fn horizon_spanning_july_august_splits_evenly() {
        // Jul 1 .. Aug 31: 31 + 31 days
        let h = Horizon::new(date(2024, 7, 1), 62).unwrap();
        let parts = h.month_fractions();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].0, 7);
        assert_eq!(parts[1].0, 8);
        assert_relative_eq!(parts[0].1, 0.5, epsilon = 1e-12);
        assert_relative_eq!(parts[1].1, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn horizon_fractions_sum_to_one() {
        let h = Horizon::new(date(2024, 11, 17), 400).unwrap();
        let total: f64 = h.month_fractions().iter().map(|(_, f)| f).sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn method_names() {
        assert_eq!(ForecastMethod::HoltLinearTrend.to_string(), "HoltLinearTrend");
        assert_eq!(ForecastMethod::ALL.len(), 4);
    }
}
