//! Sales history and period bucketing.

use crate::core::product::{ProductId, StoreId};
use crate::error::{ReplenishError, Result};
use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// One day's sales of a product at a store. Immutable historical fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesObservation {
    pub store_id: StoreId,
    pub product_id: ProductId,
    pub date: NaiveDate,
    pub quantity_sold: i64,
    #[serde(default)]
    pub revenue: f64,
}

impl SalesObservation {
    pub fn new(
        store_id: impl Into<StoreId>,
        product_id: impl Into<ProductId>,
        date: NaiveDate,
        quantity_sold: i64,
    ) -> Self {
        Self {
            store_id: store_id.into(),
            product_id: product_id.into(),
            date,
            quantity_sold,
            revenue: 0.0,
        }
    }

    pub fn with_revenue(mut self, revenue: f64) -> Self {
        self.revenue = revenue;
        self
    }
}

/// Inclusive-exclusive date range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

/// Bucketing period for demand series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    /// ISO weeks starting Monday.
    Weekly,
    /// Calendar months.
    #[default]
    Monthly,
}

impl Period {
    /// First day of the period containing `date`.
    pub fn start_of(self, date: NaiveDate) -> NaiveDate {
        match self {
            Period::Weekly => {
                date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
            }
            Period::Monthly => date - Duration::days(i64::from(date.day0())),
        }
    }

    /// Shift a period start by `periods` whole periods (negative goes back).
    pub fn shift(self, start: NaiveDate, periods: i32) -> NaiveDate {
        match self {
            Period::Weekly => start + Duration::weeks(i64::from(periods)),
            Period::Monthly => {
                let months = Months::new(periods.unsigned_abs());
                let shifted = if periods >= 0 {
                    start.checked_add_months(months)
                } else {
                    start.checked_sub_months(months)
                };
                shifted.unwrap_or(if periods >= 0 {
                    NaiveDate::MAX
                } else {
                    NaiveDate::MIN
                })
            }
        }
    }

    /// Average length of one period in days.
    pub fn average_days(self) -> f64 {
        match self {
            Period::Weekly => 7.0,
            Period::Monthly => 365.25 / 12.0,
        }
    }
}

/// A per-period demand series for one (store, product), gap-filled with zeros.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandSeries {
    period: Period,
    starts: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl DemandSeries {
    /// Create a series from explicit period starts and values.
    pub fn new(period: Period, starts: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if starts.len() != values.len() {
            return Err(ReplenishError::InvalidParameter(format!(
                "{} period starts for {} values",
                starts.len(),
                values.len()
            )));
        }
        for pair in starts.windows(2) {
            if pair[1] <= pair[0] {
                return Err(ReplenishError::InvalidParameter(
                    "period starts must be strictly increasing".to_string(),
                ));
            }
        }
        Ok(Self {
            period,
            starts,
            values,
        })
    }

    /// Consecutive periods ending just before the period that contains `end`.
    pub fn from_values(period: Period, end: NaiveDate, values: Vec<f64>) -> Self {
        let last_start = period.start_of(end);
        let n = values.len() as i32;
        let starts = (0..n)
            .map(|i| period.shift(last_start, i - n))
            .collect();
        Self {
            period,
            starts,
            values,
        }
    }

    /// Bucket observations into the `history_periods` complete periods preceding
    /// the period that contains `as_of`.
    ///
    /// Every period in the window is present; periods without sales are zero.
    /// Negative quantities are rejected as a data-integrity error.
    pub fn from_observations(
        observations: &[SalesObservation],
        period: Period,
        as_of: NaiveDate,
        history_periods: usize,
    ) -> Result<Self> {
        let range = Self::history_range(period, as_of, history_periods);
        let n = history_periods;
        let starts: Vec<NaiveDate> = (0..n)
            .map(|i| period.shift(range.start, i as i32))
            .collect();
        let mut values = vec![0.0; n];

        for obs in observations.iter().filter(|o| range.contains(o.date)) {
            if obs.quantity_sold < 0 {
                return Err(ReplenishError::DataIntegrity {
                    store_id: obs.store_id.to_string(),
                    product_id: obs.product_id.to_string(),
                    reason: format!("negative quantity sold on {}", obs.date),
                });
            }
            let bucket_start = period.start_of(obs.date);
            // starts is sorted, so the bucket index is a binary search away.
            if let Ok(idx) = starts.binary_search(&bucket_start) {
                values[idx] += obs.quantity_sold as f64;
            }
        }

        Ok(Self {
            period,
            starts,
            values,
        })
    }

    /// Date range covered by a full history window.
    pub fn history_range(period: Period, as_of: NaiveDate, history_periods: usize) -> DateRange {
        let end = period.start_of(as_of);
        let start = period.shift(end, -(history_periods as i32));
        DateRange::new(start, end)
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn starts(&self) -> &[NaiveDate] {
        &self.starts
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The last `n` values (or all of them when fewer exist).
    pub fn tail(&self, n: usize) -> &[f64] {
        &self.values[self.values.len().saturating_sub(n)..]
    }

    /// Periods from the first one with a sale to the end of the series.
    pub fn observed_periods(&self) -> usize {
        self.values
            .iter()
            .position(|v| *v > 0.0)
            .map_or(0, |first| self.values.len() - first)
    }

    /// Fraction of periods with any sale.
    pub fn selling_frequency(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().filter(|v| **v > 0.0).count() as f64 / self.values.len() as f64
    }

    /// Average demand per day across the series.
    pub fn daily_rate(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let total: f64 = self.values.iter().sum();
        total / (self.values.len() as f64 * self.period.average_days())
    }

    /// Divide each period by the factor for its calendar month.
    pub fn deseasonalized<F>(&self, factor: F) -> Vec<f64>
    where
        F: Fn(u32) -> f64,
    {
        self.starts
            .iter()
            .zip(self.values.iter())
            .map(|(start, v)| v / factor(start.month()))
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

    fn obs(d: NaiveDate, qty: i64) -> SalesObservation {
        SalesObservation::new("49", "104468", d, qty)
    }

    #[test]
    fn period_start_of() {
        // 2024-07-17 is a Wednesday
        assert_eq!(Period::Weekly.start_of(date(2024, 7, 17)), date(2024, 7, 15));
        assert_eq!(Period::Monthly.start_of(date(2024, 7, 17)), date(2024, 7, 1));
    }

    #[test]
    fn period_shift_crosses_years() {
        assert_eq!(Period::Monthly.shift(date(2024, 1, 1), -1), date(2023, 12, 1));
        assert_eq!(Period::Monthly.shift(date(2024, 11, 1), 3), date(2025, 2, 1));
        assert_eq!(Period::Weekly.shift(date(2024, 7, 15), -2), date(2024, 7, 1));
    }

    #[test]
    fn bucketing_fills_gaps_with_zero() {
        let observations = vec![
            obs(date(2024, 3, 5), 4),
            obs(date(2024, 3, 20), 6),
            obs(date(2024, 5, 2), 3),
        ];
        let series =
            DemandSeries::from_observations(&observations, Period::Monthly, date(2024, 7, 10), 6)
                .unwrap();

        // Window is Jan..Jun; the months before the first sale count as zero.
        assert_eq!(series.starts()[0], date(2024, 1, 1));
        assert_eq!(series.values(), &[0.0, 0.0, 10.0, 0.0, 3.0, 0.0]);
        assert_eq!(series.observed_periods(), 4);
    }

    #[test]
    fn single_late_sale_keeps_the_full_window() {
        let observations = vec![obs(date(2024, 5, 14), 30)];
        let series =
            DemandSeries::from_observations(&observations, Period::Monthly, date(2024, 6, 3), 12)
                .unwrap();
        assert_eq!(series.len(), 12);
        assert_eq!(series.tail(3), &[0.0, 0.0, 30.0]);
        assert_eq!(series.observed_periods(), 1);
        assert_relative_eq!(series.selling_frequency(), 1.0 / 12.0);
    }

    #[test]
    fn bucketing_ignores_current_partial_period() {
        let observations = vec![obs(date(2024, 6, 30), 2), obs(date(2024, 7, 1), 50)];
        let series =
            DemandSeries::from_observations(&observations, Period::Monthly, date(2024, 7, 10), 3)
                .unwrap();
        assert_eq!(series.values(), &[0.0, 0.0, 2.0]);
    }

    #[test]
    fn bucketing_rejects_negative_quantities() {
        let observations = vec![obs(date(2024, 6, 3), -1)];
        let err =
            DemandSeries::from_observations(&observations, Period::Weekly, date(2024, 7, 10), 8)
                .unwrap_err();
        assert!(err.is_data_integrity());
    }

    #[test]
    fn no_observations_yields_zero_series() {
        let series =
            DemandSeries::from_observations(&[], Period::Weekly, date(2024, 7, 10), 8).unwrap();
        assert_eq!(series.values(), &[0.0; 8]);
        assert_eq!(series.observed_periods(), 0);
        assert_eq!(series.daily_rate(), 0.0);
    }

    #[test]
    fn from_values_ends_before_reference_period() {
        let series = DemandSeries::from_values(Period::Weekly, date(2024, 7, 17), vec![1.0, 2.0]);
        assert_eq!(series.starts(), &[date(2024, 7, 1), date(2024, 7, 8)]);
    }

    #[test]
    fn selling_frequency_and_rate() {
        let series = DemandSeries::from_values(
            Period::Weekly,
            date(2024, 7, 17),
            vec![7.0, 0.0, 14.0, 0.0],
        );
        assert_relative_eq!(series.selling_frequency(), 0.5);
        assert_relative_eq!(series.daily_rate(), 21.0 / 28.0);
        assert_eq!(series.tail(2), &[14.0, 0.0]);
        assert_eq!(series.tail(10).len(), 4);
    }

    #[test]
    fn deseasonalized_divides_by_month_factor() {
        let series = DemandSeries::new(
            Period::Monthly,
            vec![date(2024, 7, 1), date(2024, 8, 1)],
            vec![16.0, 15.0],
        )
        .unwrap();
        let adjusted = series.deseasonalized(|m| if m == 7 { 1.6 } else { 1.5 });
        assert_relative_eq!(adjusted[0], 10.0, epsilon = 1e-12);
        assert_relative_eq!(adjusted[1], 10.0, epsilon = 1e-12);
    }

    #[test]
    fn new_validates_shape() {
        assert!(DemandSeries::new(Period::Monthly, vec![date(2024, 1, 1)], vec![]).is_err());
        assert!(DemandSeries::new(
            Period::Monthly,
            vec![date(2024, 2, 1), date(2024, 1, 1)],
            vec![1.0, 2.0]
        )
        .is_err());
    }
}
