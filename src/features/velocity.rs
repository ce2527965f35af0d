//! Velocity classification from bucketed sales history.

use crate::config::VelocityThresholds;
use crate::core::{DemandSeries, VelocityCategory};

const DAYS_PER_MONTH: f64 = 30.0;

/// Classify a product by its average demand per 30 days.
///
/// Products that sold in fewer than `min_selling_frequency` of their periods
/// drop one class: sporadic demand is harder to forecast than its average
/// suggests. An empty series is a very slow mover.
pub fn classify_velocity(
    series: &DemandSeries,
    thresholds: &VelocityThresholds,
) -> VelocityCategory {
    if series.is_empty() {
        return VelocityCategory::VerySlowMover;
    }

    let monthly = series.daily_rate() * DAYS_PER_MONTH;
    let category = if monthly >= thresholds.fast_mover {
        VelocityCategory::FastMover
    } else if monthly >= thresholds.medium_mover {
        VelocityCategory::MediumMover
    } else if monthly >= thresholds.slow_mover {
        VelocityCategory::SlowMover
    } else {
        VelocityCategory::VerySlowMover
    };

    if series.selling_frequency() < thresholds.min_selling_frequency {
        category.slower()
    } else {
        category
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Period;
    use chrono::NaiveDate;

    fn weekly(values: &[f64]) -> DemandSeries {
        let end = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        DemandSeries::from_values(Period::Weekly, end, values.to_vec())
    }

    #[test]
    fn steady_weekly_sales_are_fast() {
        // ~11.5 a week is ~49 per 30 days
        let series = weekly(&[10.0, 12.0, 11.0, 13.0]);
        assert_eq!(
            classify_velocity(&series, &VelocityThresholds::default()),
            VelocityCategory::FastMover
        );
    }

    #[test]
    fn monthly_thresholds() {
        let end = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let t = VelocityThresholds::default();
        let classify = |v: f64| {
            classify_velocity(&DemandSeries::from_values(Period::Monthly, end, vec![v; 6]), &t)
        };
        assert_eq!(classify(40.0), VelocityCategory::FastMover);
        assert_eq!(classify(15.0), VelocityCategory::MediumMover);
        assert_eq!(classify(5.0), VelocityCategory::SlowMover);
        assert_eq!(classify(1.0), VelocityCategory::VerySlowMover);
    }

    #[test]
    fn sporadic_sales_are_demoted() {
        // high average, but only one week in four sold
        let series = weekly(&[0.0, 0.0, 60.0, 0.0]);
        assert_eq!(
            classify_velocity(&series, &VelocityThresholds::default()),
            VelocityCategory::MediumMover
        );
    }

    #[test]
    fn empty_history_is_very_slow() {
        let series = weekly(&[]);
        assert_eq!(
            classify_velocity(&series, &VelocityThresholds::default()),
            VelocityCategory::VerySlowMover
        );
    }
}
