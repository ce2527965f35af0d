//! Retained forecast history for accuracy tracking.

use crate::core::forecast::ForecastResult;
use crate::core::product::{ProductId, StoreId};
use crate::error::{ReplenishError, Result};
use crate::utils::metrics::{calculate_metrics, AccuracyMetrics};
use std::collections::HashMap;

/// A forecast as issued by a particular run.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub run: usize,
    pub result: ForecastResult,
}

/// Append-only store of issued forecasts.
///
/// Later runs supersede earlier ones for "latest" lookups, but nothing is
/// overwritten, so past runs can still be scored once actuals arrive.
#[derive(Debug, Clone, Default)]
pub struct ForecastLedger {
    entries: Vec<LedgerEntry>,
    runs: usize,
}

impl ForecastLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one run's forecasts and return its run number (starting at 1).
    pub fn record_run<I>(&mut self, results: I) -> usize
    where
        I: IntoIterator<Item = ForecastResult>,
    {
        self.runs += 1;
        let run = self.runs;
        self.entries
            .extend(results.into_iter().map(|result| LedgerEntry { run, result }));
        run
    }

    pub fn runs(&self) -> usize {
        self.runs
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All forecasts issued for a series, oldest first.
    pub fn history(&self, store_id: &StoreId, product_id: &ProductId) -> Vec<&LedgerEntry> {
        self.entries
            .iter()
            .filter(|e| &e.result.store_id == store_id && &e.result.product_id == product_id)
            .collect()
    }

    /// Most recent forecast for a series.
    pub fn latest(&self, store_id: &StoreId, product_id: &ProductId) -> Option<&ForecastResult> {
        self.entries
            .iter()
            .rev()
            .find(|e| &e.result.store_id == store_id && &e.result.product_id == product_id)
            .map(|e| &e.result)
    }

    /// Score a run against realised demand over each forecast's horizon.
    ///
    /// Series without an actual are skipped.
    pub fn accuracy(
        &self,
        run: usize,
        actuals: &HashMap<(StoreId, ProductId), f64>,
    ) -> Result<AccuracyMetrics> {
        let (actual, predicted): (Vec<f64>, Vec<f64>) = self
            .entries
            .iter()
            .filter(|e| e.run == run)
            .filter_map(|e| {
                actuals
                    .get(&(e.result.store_id.clone(), e.result.product_id.clone()))
                    .map(|a| (*a, e.result.predicted_demand as f64))
            })
            .unzip();

        if actual.is_empty() {
            return Err(ReplenishError::EmptyData);
        }
        calculate_metrics(&actual, &predicted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forecast::Horizon;
    use crate::core::product::VelocityCategory;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn result(product: &str, predicted: u64, day: u32) -> ForecastResult {
        let start = NaiveDate::from_ymd_opt(2024, 7, day).unwrap();
        ForecastResult {
            store_id: StoreId::from("49"),
            product_id: ProductId::from(product),
            forecast_date: start,
            horizon: Horizon::new(start, 30).unwrap(),
            velocity: VelocityCategory::FastMover,
            base_per_period: predicted as f64,
            seasonal_factor: 1.0,
            daily_demand: predicted as f64 / 30.0,
            predicted_demand: predicted,
            confidence_score: 80.0,
            history_periods: 12,
            contributions: Vec::new(),
        }
    }

    #[test]
    fn later_runs_supersede_without_mutating() {
        let mut ledger = ForecastLedger::new();
        let r1 = ledger.record_run(vec![result("1", 30, 1)]);
        let r2 = ledger.record_run(vec![result("1", 45, 8)]);
        assert_eq!((r1, r2), (1, 2));

        let store = StoreId::from("49");
        let product = ProductId::from("1");
        assert_eq!(ledger.latest(&store, &product).unwrap().predicted_demand, 45);
        let history = ledger.history(&store, &product);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].result.predicted_demand, 30);
    }

    #[test]
    fn accuracy_scores_a_single_run() {
        let mut ledger = ForecastLedger::new();
        let run = ledger.record_run(vec![result("1", 30, 1), result("2", 10, 1)]);
        ledger.record_run(vec![result("1", 99, 8)]);

        let mut actuals = HashMap::new();
        actuals.insert((StoreId::from("49"), ProductId::from("1")), 27.0);
        actuals.insert((StoreId::from("49"), ProductId::from("2")), 12.0);

        let metrics = ledger.accuracy(run, &actuals).unwrap();
        assert_eq!(metrics.count, 2);
        assert_relative_eq!(metrics.mae, 2.5, epsilon = 1e-10);
        assert_relative_eq!(metrics.bias, 0.5, epsilon = 1e-10);
    }

    #[test]
    fn accuracy_without_actuals_is_empty() {
        let mut ledger = ForecastLedger::new();
        let run = ledger.record_run(vec![result("1", 30, 1)]);
        assert!(matches!(
            ledger.accuracy(run, &HashMap::new()),
            Err(ReplenishError::EmptyData)
        ));
    }
}
