//! Reorder point, order quantity and urgency for one (store, product).

use crate::config::{ReorderPolicy, VelocityParams};
use crate::core::{ForecastResult, InventorySnapshot, ProductId, StoreId, VelocityCategory};
use crate::reorder::ReorderAction;
use serde::{Deserialize, Serialize};

/// Stocking advice derived from one forecast and one inventory snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderRecommendation {
    pub store_id: StoreId,
    pub product_id: ProductId,
    pub velocity: VelocityCategory,
    pub lead_time_days: u32,
    pub quantity_available: u64,
    /// Forecast demand per day.
    pub daily_demand: f64,
    pub safety_stock_units: u64,
    pub reorder_point: u64,
    pub order_quantity: u64,
    /// `None` when forecast demand is zero.
    pub days_until_stockout: Option<f64>,
    pub action: ReorderAction,
    pub confidence_score: f64,
}

impl ReorderRecommendation {
    pub fn priority(&self) -> u8 {
        self.action.priority()
    }
}

/// Pure reorder computation; holds only the classification thresholds.
#[derive(Debug, Clone, Default)]
pub struct ReorderCalculator {
    policy: ReorderPolicy,
}

impl ReorderCalculator {
    pub fn new(policy: ReorderPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ReorderPolicy {
        &self.policy
    }

    pub fn calculate(
        &self,
        forecast: &ForecastResult,
        snapshot: &InventorySnapshot,
        lead_time_days: u32,
        params: &VelocityParams,
    ) -> ReorderRecommendation {
        let daily = if forecast.daily_demand.is_finite() {
            forecast.daily_demand.max(0.0)
        } else {
            0.0
        };
        let available = snapshot.quantity_available();
        let lead = f64::from(lead_time_days);

        let safety = params.safety_stock_days * daily;
        let reorder_point = whole_units(daily * lead + safety);
        let order_quantity = whole_units(params.target_cover_days * daily - available as f64);
        let days_until_stockout = (daily > 0.0).then(|| available as f64 / daily);

        let action = self.classify(
            available,
            daily,
            days_until_stockout,
            lead,
            reorder_point,
            params,
        );

        ReorderRecommendation {
            store_id: forecast.store_id.clone(),
            product_id: forecast.product_id.clone(),
            velocity: forecast.velocity,
            lead_time_days,
            quantity_available: available,
            daily_demand: daily,
            safety_stock_units: whole_units(safety),
            reorder_point,
            order_quantity,
            days_until_stockout,
            action,
            confidence_score: forecast.confidence_score,
        }
    }

    /// First matching rule wins.
    fn classify(
        &self,
        available: u64,
        daily: f64,
        days_until_stockout: Option<f64>,
        lead: f64,
        reorder_point: u64,
        params: &VelocityParams,
    ) -> ReorderAction {
        // no expected demand, nothing can run out
        let Some(days) = days_until_stockout else {
            return ReorderAction::Ok;
        };

        if available == 0 {
            ReorderAction::OUT_OF_STOCK
        } else if days < lead {
            ReorderAction::STOCKOUT_BEFORE_DELIVERY
        } else if days < lead + self.policy.reorder_soon_margin_days {
            ReorderAction::ReorderSoon
        } else if available as f64
            > params.target_cover_days * daily * self.policy.overstock_multiplier
        {
            ReorderAction::Overstock
        } else if available <= reorder_point {
            ReorderAction::Monitor
        } else {
            ReorderAction::Ok
        }
    }
}

/// Round up to whole units, never below zero.
fn whole_units(quantity: f64) -> u64 {
    if quantity.is_finite() && quantity > 0.0 {
        quantity.ceil() as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VelocityTable;
    use crate::core::Horizon;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn forecast(daily: f64, velocity: VelocityCategory) -> ForecastResult {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        ForecastResult {
            store_id: StoreId::new("49"),
            product_id: ProductId::new("104468"),
            forecast_date: start,
            horizon: Horizon::new(start, 60).unwrap(),
            velocity,
            base_per_period: daily * 30.0,
            seasonal_factor: 1.0,
            daily_demand: daily,
            predicted_demand: (daily * 60.0).round() as u64,
            confidence_score: 80.0,
            history_periods: 12,
            contributions: Vec::new(),
        }
    }

    fn stock(available: i64) -> InventorySnapshot {
        InventorySnapshot::new("49", "104468", available, 0)
    }

    fn fast_params() -> VelocityParams {
        VelocityTable::default().fast_mover.clone()
    }

    fn run(daily: f64, available: i64) -> ReorderRecommendation {
        ReorderCalculator::default().calculate(
            &forecast(daily, VelocityCategory::FastMover),
            &stock(available),
            14,
            &fast_params(),
        )
    }

    #[test]
    fn quantities_for_fast_mover() {
        let rec = run(2.0, 10);
        // 2/day * 14 lead + 2/day * 30 safety
        assert_eq!(rec.reorder_point, 88);
        assert_eq!(rec.safety_stock_units, 60);
        // 60 cover days * 2 - 10
        assert_eq!(rec.order_quantity, 110);
        assert_relative_eq!(rec.days_until_stockout.unwrap(), 5.0);
        assert_eq!(rec.action, ReorderAction::STOCKOUT_BEFORE_DELIVERY);
    }

    #[test]
    fn out_of_stock_is_most_urgent() {
        let rec = run(1.0, 0);
        assert_eq!(rec.action, ReorderAction::OUT_OF_STOCK);
        assert_eq!(rec.priority(), 1);
    }

    #[test]
    fn reorder_soon_inside_margin() {
        // 20 days of cover: past the 14-day lead time, inside lead + 14
        let rec = run(1.0, 20);
        assert_eq!(rec.action, ReorderAction::ReorderSoon);
    }

    #[test]
    fn monitor_below_reorder_point() {
        // 40 days of cover, reorder point 44
        let rec = run(1.0, 40);
        assert_eq!(rec.reorder_point, 44);
        assert_eq!(rec.action, ReorderAction::Monitor);
    }

    #[test]
    fn ok_between_reorder_point_and_overstock() {
        let rec = run(1.0, 100);
        assert_eq!(rec.action, ReorderAction::Ok);
        assert_eq!(rec.order_quantity, 0);
    }

    #[test]
    fn overstock_beyond_multiple_of_cover() {
        // 60 cover days * 2.0 multiplier = 120 days
        let rec = run(1.0, 121);
        assert_eq!(rec.action, ReorderAction::Overstock);
        let rec = run(1.0, 120);
        assert_eq!(rec.action, ReorderAction::Ok);
    }

    #[test]
    fn zero_demand_is_ok_without_stockout_date() {
        let rec = run(0.0, 0);
        assert_eq!(rec.action, ReorderAction::Ok);
        assert!(rec.days_until_stockout.is_none());
        assert_eq!(rec.reorder_point, 0);
        assert_eq!(rec.order_quantity, 0);
    }

    #[test]
    fn reserved_stock_is_not_available() {
        let snapshot = InventorySnapshot::new("49", "104468", 30, 30);
        let rec = ReorderCalculator::default().calculate(
            &forecast(1.0, VelocityCategory::FastMover),
            &snapshot,
            14,
            &fast_params(),
        );
        assert_eq!(rec.quantity_available, 0);
        assert_eq!(rec.action, ReorderAction::OUT_OF_STOCK);
    }

    #[test]
    fn slower_class_holds_more_safety_stock() {
        let table = VelocityTable::default();
        let calc = ReorderCalculator::default();
        let fast = calc.calculate(
            &forecast(1.0, VelocityCategory::FastMover),
            &stock(50),
            14,
            &table.fast_mover,
        );
        let very_slow = calc.calculate(
            &forecast(1.0, VelocityCategory::VerySlowMover),
            &stock(50),
            14,
            &table.very_slow_mover,
        );
        assert!(very_slow.safety_stock_units > fast.safety_stock_units);
        assert!(very_slow.order_quantity > fast.order_quantity);
    }
}
