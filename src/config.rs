//! Engine configuration.
//!
//! One immutable value carries every tunable the engine reads: bucketing,
//! per-velocity forecasting and stocking parameters, the seasonal table,
//! supplier lead times and exclusion rules. It is loaded from JSON and
//! validated once; an invalid configuration rejects the run before any
//! computation.

use crate::core::{ForecastMethod, Period, ProductStatus, VelocityCategory};
use crate::error::{ReplenishError, Result};
use crate::seasonality::SeasonalityModel;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Full engine configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub forecasting: ForecastingConfig,
    #[serde(default)]
    pub classification: VelocityThresholds,
    #[serde(default)]
    pub velocity: VelocityTable,
    #[serde(default)]
    pub seasonality: SeasonalityModel,
    #[serde(default)]
    pub reorder: ReorderPolicy,
    #[serde(default)]
    pub lead_times: LeadTimes,
    #[serde(default)]
    pub exclusions: ExclusionConfig,
}

impl EngineConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ReplenishError::ConfigLoad(format!("configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ReplenishError::ConfigLoad(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.forecasting.validate()?;
        self.classification.validate()?;
        self.velocity.validate()?;
        self.seasonality.validate()?;
        self.reorder.validate()?;
        self.lead_times.validate()?;
        self.exclusions.validate()
    }
}

fn invalid(msg: impl Into<String>) -> ReplenishError {
    ReplenishError::InvalidConfiguration(msg.into())
}

/// How history is bucketed and which base forecasters are built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastingConfig {
    #[serde(default)]
    pub period: Period,
    /// Complete periods of history read before the run date.
    #[serde(default = "default_history_periods")]
    pub history_periods: usize,
    #[serde(default = "default_window")]
    pub sma_window: usize,
    #[serde(default = "default_window")]
    pub wma_window: usize,
    /// Recent periods examined by the trend test gating Holt.
    #[serde(default = "default_trend_window")]
    pub trend_window: usize,
    /// Minimum |Mann-Kendall tau| for Holt to participate.
    #[serde(default = "default_min_trend_strength")]
    pub min_trend_strength: f64,
    /// Divide history by month factors before the base forecasters run.
    #[serde(default = "default_true")]
    pub deseasonalize_history: bool,
}

impl Default for ForecastingConfig {
    fn default() -> Self {
        Self {
            period: Period::default(),
            history_periods: default_history_periods(),
            sma_window: default_window(),
            wma_window: default_window(),
            trend_window: default_trend_window(),
            min_trend_strength: default_min_trend_strength(),
            deseasonalize_history: default_true(),
        }
    }
}

impl ForecastingConfig {
    fn validate(&self) -> Result<()> {
        if self.history_periods == 0 {
            return Err(invalid("history_periods must be at least 1"));
        }
        if self.sma_window == 0 || self.wma_window == 0 {
            return Err(invalid("moving-average windows must be at least 1"));
        }
        if self.trend_window < crate::features::TrendTest::MIN_PERIODS {
            return Err(invalid(format!(
                "trend_window must be at least {}",
                crate::features::TrendTest::MIN_PERIODS
            )));
        }
        if !(self.min_trend_strength > 0.0 && self.min_trend_strength <= 1.0) {
            return Err(invalid("min_trend_strength must be in (0, 1]"));
        }
        Ok(())
    }
}

fn default_history_periods() -> usize {
    12
}
fn default_window() -> usize {
    3
}
fn default_trend_window() -> usize {
    6
}
fn default_min_trend_strength() -> f64 {
    0.6
}
fn default_true() -> bool {
    true
}

/// Demand thresholds (units per 30 days) separating velocity classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VelocityThresholds {
    pub fast_mover: f64,
    pub medium_mover: f64,
    pub slow_mover: f64,
    /// Products selling in fewer periods than this share drop one class.
    pub min_selling_frequency: f64,
}

impl Default for VelocityThresholds {
    fn default() -> Self {
        Self {
            fast_mover: 30.0,
            medium_mover: 10.0,
            slow_mover: 3.0,
            min_selling_frequency: 0.5,
        }
    }
}

impl VelocityThresholds {
    fn validate(&self) -> Result<()> {
        if !(self.fast_mover > self.medium_mover
            && self.medium_mover > self.slow_mover
            && self.slow_mover >= 0.0)
        {
            return Err(invalid(
                "velocity thresholds must satisfy fast > medium > slow >= 0",
            ));
        }
        if !(0.0..=1.0).contains(&self.min_selling_frequency) {
            return Err(invalid("min_selling_frequency must be in [0, 1]"));
        }
        Ok(())
    }
}

/// Ensemble weight per base method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MethodWeights {
    pub sma: f64,
    pub wma: f64,
    pub exponential: f64,
    pub holt: f64,
}

impl MethodWeights {
    pub fn new(sma: f64, wma: f64, exponential: f64, holt: f64) -> Self {
        Self {
            sma,
            wma,
            exponential,
            holt,
        }
    }

    pub fn get(&self, method: ForecastMethod) -> f64 {
        match method {
            ForecastMethod::SimpleMovingAverage => self.sma,
            ForecastMethod::WeightedMovingAverage => self.wma,
            ForecastMethod::ExponentialSmoothing => self.exponential,
            ForecastMethod::HoltLinearTrend => self.holt,
        }
    }

    pub fn sum(&self) -> f64 {
        ForecastMethod::ALL.iter().map(|m| self.get(*m)).sum()
    }

    fn validate(&self, category: VelocityCategory) -> Result<()> {
        for method in ForecastMethod::ALL {
            let w = self.get(method);
            if !w.is_finite() || w < 0.0 {
                return Err(invalid(format!(
                    "{category}: weight for {method} must be non-negative, got {w}"
                )));
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(invalid(format!(
                "{category}: ensemble weights must sum to 1, got {sum}"
            )));
        }
        Ok(())
    }
}

/// Forecasting and stocking parameters for one velocity class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityParams {
    /// Level smoothing for exponential smoothing and Holt.
    pub alpha: f64,
    /// Trend smoothing for Holt.
    pub beta: f64,
    /// Days of demand held as safety stock.
    pub safety_stock_days: f64,
    /// Days of demand an order should cover.
    pub target_cover_days: f64,
    pub weights: MethodWeights,
}

impl VelocityParams {
    fn validate(&self, category: VelocityCategory) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(invalid(format!("{category}: alpha must be in (0, 1]")));
        }
        if !(self.beta > 0.0 && self.beta <= 1.0) {
            return Err(invalid(format!("{category}: beta must be in (0, 1]")));
        }
        if !self.safety_stock_days.is_finite() || self.safety_stock_days < 0.0 {
            return Err(invalid(format!(
                "{category}: safety_stock_days must be >= 0"
            )));
        }
        if !self.target_cover_days.is_finite() || self.target_cover_days <= 0.0 {
            return Err(invalid(format!(
                "{category}: target_cover_days must be > 0"
            )));
        }
        self.weights.validate(category)
    }
}

/// Explicit mapping from velocity class to its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VelocityTable {
    pub fast_mover: VelocityParams,
    pub medium_mover: VelocityParams,
    pub slow_mover: VelocityParams,
    pub very_slow_mover: VelocityParams,
}

impl VelocityTable {
    pub fn get(&self, category: VelocityCategory) -> &VelocityParams {
        match category {
            VelocityCategory::FastMover => &self.fast_mover,
            VelocityCategory::MediumMover => &self.medium_mover,
            VelocityCategory::SlowMover => &self.slow_mover,
            VelocityCategory::VerySlowMover => &self.very_slow_mover,
        }
    }

    fn validate(&self) -> Result<()> {
        for category in VelocityCategory::ALL {
            self.get(category).validate(category)?;
        }
        Ok(())
    }
}

impl Default for VelocityTable {
    fn default() -> Self {
        Self {
            // Fast movers lean on the reactive methods.
            fast_mover: VelocityParams {
                alpha: 0.5,
                beta: 0.2,
                safety_stock_days: 30.0,
                target_cover_days: 60.0,
                weights: MethodWeights::new(0.15, 0.30, 0.35, 0.20),
            },
            medium_mover: VelocityParams {
                alpha: 0.3,
                beta: 0.1,
                safety_stock_days: 45.0,
                target_cover_days: 90.0,
                weights: MethodWeights::new(0.25, 0.25, 0.25, 0.25),
            },
            // Slow movers lean on the averages.
            slow_mover: VelocityParams {
                alpha: 0.2,
                beta: 0.1,
                safety_stock_days: 45.0,
                target_cover_days: 90.0,
                weights: MethodWeights::new(0.40, 0.30, 0.20, 0.10),
            },
            very_slow_mover: VelocityParams {
                alpha: 0.1,
                beta: 0.05,
                safety_stock_days: 60.0,
                target_cover_days: 120.0,
                weights: MethodWeights::new(0.55, 0.25, 0.15, 0.05),
            },
        }
    }
}

/// Thresholds for the action classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReorderPolicy {
    /// Stock above `target cover × multiplier` days of demand is overstock.
    pub overstock_multiplier: f64,
    /// Days beyond lead time inside which an order should be placed soon.
    pub reorder_soon_margin_days: f64,
    /// Cover below this many days counts as at risk in summaries.
    pub at_risk_days: f64,
}

impl Default for ReorderPolicy {
    fn default() -> Self {
        Self {
            overstock_multiplier: 2.0,
            reorder_soon_margin_days: 14.0,
            at_risk_days: 14.0,
        }
    }
}

impl ReorderPolicy {
    fn validate(&self) -> Result<()> {
        if !self.overstock_multiplier.is_finite() || self.overstock_multiplier <= 1.0 {
            return Err(invalid("overstock_multiplier must be > 1"));
        }
        if !self.reorder_soon_margin_days.is_finite() || self.reorder_soon_margin_days < 0.0 {
            return Err(invalid("reorder_soon_margin_days must be >= 0"));
        }
        if !self.at_risk_days.is_finite() || self.at_risk_days < 0.0 {
            return Err(invalid("at_risk_days must be >= 0"));
        }
        Ok(())
    }
}

/// Supplier lead times in days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadTimes {
    pub default_days: i64,
    pub suppliers: HashMap<String, i64>,
}

impl Default for LeadTimes {
    fn default() -> Self {
        Self {
            default_days: 14,
            suppliers: HashMap::new(),
        }
    }
}

impl LeadTimes {
    /// Lead time for a supplier, falling back to the default.
    pub fn for_supplier(&self, supplier: Option<&str>) -> u32 {
        let days = supplier
            .and_then(|s| self.suppliers.get(s))
            .copied()
            .unwrap_or(self.default_days);
        days.clamp(0, i64::from(u32::MAX)) as u32
    }

    fn validate(&self) -> Result<()> {
        if self.default_days < 0 {
            return Err(invalid(format!(
                "default lead time must be >= 0, got {}",
                self.default_days
            )));
        }
        for (supplier, days) in &self.suppliers {
            if *days < 0 {
                return Err(invalid(format!(
                    "lead time for supplier {supplier} must be >= 0, got {days}"
                )));
            }
        }
        Ok(())
    }
}

/// Which exclusion rules are active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExclusionConfig {
    /// Case-insensitive substrings of the description.
    pub keywords: Vec<String>,
    /// Exact item numbers.
    pub blocked_items: Vec<String>,
    /// Exclude descriptions naming a past year ("2023 Calendar").
    pub exclude_dated: bool,
    /// Exclude items selling below cost.
    pub exclude_negative_margin: bool,
    pub excluded_statuses: Vec<ProductStatus>,
}

impl Default for ExclusionConfig {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            blocked_items: Vec::new(),
            exclude_dated: true,
            exclude_negative_margin: true,
            excluded_statuses: vec![ProductStatus::Discontinued, ProductStatus::Service],
        }
    }
}

impl ExclusionConfig {
    fn validate(&self) -> Result<()> {
        if self.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(invalid("exclusion keywords must not be blank"));
        }
        if self.blocked_items.iter().any(|k| k.trim().is_empty()) {
            return Err(invalid("blocked item numbers must not be blank"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.forecasting.history_periods, 12);
        assert_eq!(config.lead_times.default_days, 14);
    }

    #[test]
    fn partial_document_overrides_fields() {
        let json = r#"{
            "forecasting": { "period": "weekly", "history_periods": 26 },
            "lead_times": { "default_days": 10, "suppliers": { "PEPA": 21 } },
            "exclusions": { "keywords": ["discontinued"] }
        }"#;
        let config = EngineConfig::from_json_str(json).unwrap();
        assert_eq!(config.forecasting.period, Period::Weekly);
        assert_eq!(config.forecasting.history_periods, 26);
        assert_eq!(config.forecasting.sma_window, 3);
        assert_eq!(config.lead_times.for_supplier(Some("PEPA")), 21);
        assert_eq!(config.lead_times.for_supplier(Some("POST")), 10);
        assert_eq!(config.lead_times.for_supplier(None), 10);
        assert!(config.exclusions.exclude_dated);
        assert_eq!(config.exclusions.keywords, vec!["discontinued".to_string()]);
    }

    #[test]
    fn weights_must_sum_to_one() {
        let mut config = EngineConfig::default();
        config.velocity.fast_mover.weights = MethodWeights::new(0.5, 0.5, 0.5, 0.0);
        assert!(matches!(
            config.validate(),
            Err(ReplenishError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn negative_weight_is_rejected() {
        let mut config = EngineConfig::default();
        config.velocity.slow_mover.weights = MethodWeights::new(1.2, -0.2, 0.0, 0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn negative_lead_time_is_rejected() {
        let json = r#"{ "lead_times": { "default_days": -3 } }"#;
        assert!(matches!(
            EngineConfig::from_json_str(json),
            Err(ReplenishError::InvalidConfiguration(_))
        ));

        let mut config = EngineConfig::default();
        config.lead_times.suppliers.insert("PEPA".to_string(), -1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn alpha_out_of_range_is_rejected() {
        let mut config = EngineConfig::default();
        config.velocity.medium_mover.alpha = 0.0;
        assert!(config.validate().is_err());
        config.velocity.medium_mover.alpha = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn overstock_multiplier_must_exceed_one() {
        let mut config = EngineConfig::default();
        config.reorder.overstock_multiplier = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_json_is_a_load_error() {
        assert!(matches!(
            EngineConfig::from_json_str("{ not json"),
            Err(ReplenishError::ConfigLoad(_))
        ));
    }

    #[test]
    fn missing_file_is_a_load_error() {
        assert!(matches!(
            EngineConfig::from_path("/nonexistent/replenish.json"),
            Err(ReplenishError::ConfigLoad(_))
        ));
    }

    #[test]
    fn velocity_table_maps_every_category() {
        let table = VelocityTable::default();
        assert_eq!(table.get(VelocityCategory::FastMover).target_cover_days, 60.0);
        assert_eq!(table.get(VelocityCategory::SlowMover).target_cover_days, 90.0);
        assert!(
            table.get(VelocityCategory::VerySlowMover).safety_stock_days
                > table.get(VelocityCategory::FastMover).safety_stock_days
        );
    }
}
