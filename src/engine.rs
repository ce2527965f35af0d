//! The replenishment engine: forecasts, reorder advice and the batch list.
//!
//! The engine is a pure transform from (sales history, inventory, config)
//! to forecasts and recommendations. It holds no mutable state, so every
//! (store, product) pair can be evaluated independently; batch runs fan out
//! over rayon's thread pool.

use crate::config::EngineConfig;
use crate::core::{
    Catalog, DemandSeries, ForecastMethod, ForecastResult, Horizon, InventorySnapshot,
    MethodContribution, Product, ProductId, StoreId, VelocityCategory,
};
use crate::error::{ReplenishError, Result};
use crate::exclusion::{ExclusionFilter, ExclusionRule};
use crate::features::classify_velocity;
use crate::models::ensemble::{confidence_score, Ensemble};
use crate::reorder::{ReorderAction, ReorderCalculator, ReorderRecommendation, ReorderSummary};
use crate::source::{InventoryReader, SalesHistoryReader};
use chrono::{Datelike, NaiveDate};
use rayon::prelude::*;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use tracing::{debug, info, warn};

/// Narrowing applied to a batch reorder list. Empty lists match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReorderFilters {
    pub store_ids: Vec<StoreId>,
    pub velocities: Vec<VelocityCategory>,
    pub actions: Vec<ReorderAction>,
    /// Keep only urgent actions.
    pub urgent_only: bool,
    /// Case-insensitive match on item number or description.
    pub search: Option<String>,
}

impl ReorderFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stores(mut self, stores: impl IntoIterator<Item = StoreId>) -> Self {
        self.store_ids = stores.into_iter().collect();
        self
    }

    pub fn with_velocities(
        mut self,
        velocities: impl IntoIterator<Item = VelocityCategory>,
    ) -> Self {
        self.velocities = velocities.into_iter().collect();
        self
    }

    pub fn with_actions(mut self, actions: impl IntoIterator<Item = ReorderAction>) -> Self {
        self.actions = actions.into_iter().collect();
        self
    }

    pub fn urgent_only(mut self) -> Self {
        self.urgent_only = true;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    fn matches_store(&self, store: &StoreId) -> bool {
        self.store_ids.is_empty() || self.store_ids.contains(store)
    }

    fn matches_product(&self, product: &Product) -> bool {
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                product.id.as_str().to_lowercase().contains(&term)
                    || product.description.to_lowercase().contains(&term)
            }
        }
    }

    fn matches_recommendation(&self, rec: &ReorderRecommendation) -> bool {
        (self.velocities.is_empty() || self.velocities.contains(&rec.velocity))
            && (self.actions.is_empty() || self.actions.contains(&rec.action))
            && (!self.urgent_only || rec.action.is_urgent())
    }
}

/// A product kept off the list and the rule responsible.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcludedItem {
    pub recommendation: ReorderRecommendation,
    pub rule: ExclusionRule,
}

/// A (store, product) the batch could not evaluate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchFailure {
    pub store_id: StoreId,
    pub product_id: ProductId,
    #[serde(serialize_with = "serialize_display")]
    pub error: ReplenishError,
}

fn serialize_display<S: Serializer>(
    error: &ReplenishError,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Result of a batch run: the ordered list plus everything left out of it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    /// Ordered by action priority, then soonest stockout.
    pub recommendations: Vec<ReorderRecommendation>,
    pub excluded: Vec<ExcludedItem>,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn summary(&self, config: &EngineConfig) -> ReorderSummary {
        ReorderSummary::from_recommendations(&self.recommendations, &config.reorder)
    }
}

/// Answer to "why is this product (not) on the list".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub store_id: StoreId,
    pub product_id: ProductId,
    pub description: String,
    /// Whether the product appears in the reorder list.
    pub included: bool,
    pub matching_rule: Option<ExclusionRule>,
    pub velocity: Option<VelocityCategory>,
    pub contributing_forecasters: Vec<ForecastMethod>,
    pub contributions: Vec<MethodContribution>,
    pub confidence: f64,
    pub action: Option<ReorderAction>,
    /// Why no recommendation could be made, if that is the case.
    pub issue: Option<String>,
}

/// Forecasting and reorder engine over in-memory inputs.
pub struct ReplenishmentEngine<S, I> {
    config: EngineConfig,
    catalog: Catalog,
    stores: Vec<StoreId>,
    sales: S,
    inventory: I,
    as_of: NaiveDate,
    exclusions: ExclusionFilter,
    calculator: ReorderCalculator,
}

impl<S, I> ReplenishmentEngine<S, I>
where
    S: SalesHistoryReader,
    I: InventoryReader,
{
    /// Validate `config` and build an engine that plans as of `as_of`.
    pub fn new(
        config: EngineConfig,
        catalog: Catalog,
        stores: Vec<StoreId>,
        sales: S,
        inventory: I,
        as_of: NaiveDate,
    ) -> Result<Self> {
        config.validate()?;
        let exclusions = ExclusionFilter::from_config(&config.exclusions, as_of.year());
        let calculator = ReorderCalculator::new(config.reorder.clone());
        Ok(Self {
            config,
            catalog,
            stores,
            sales,
            inventory,
            as_of,
            exclusions,
            calculator,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn stores(&self) -> &[StoreId] {
        &self.stores
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    pub fn exclusions(&self) -> &ExclusionFilter {
        &self.exclusions
    }

    fn product(&self, product_id: &ProductId) -> Result<&Product> {
        self.catalog
            .get(product_id)
            .ok_or_else(|| ReplenishError::UnknownProduct(product_id.to_string()))
    }

    /// Bucketed history for one (store, product).
    pub fn demand_series(
        &self,
        store_id: &StoreId,
        product_id: &ProductId,
    ) -> Result<DemandSeries> {
        let fc = &self.config.forecasting;
        let range = DemandSeries::history_range(fc.period, self.as_of, fc.history_periods);
        let observations = self.sales.observations(store_id, product_id, range)?;
        DemandSeries::from_observations(&observations, fc.period, self.as_of, fc.history_periods)
    }

    /// The product's configured class, or one classified from its history.
    pub fn velocity_of(&self, product: &Product, series: &DemandSeries) -> VelocityCategory {
        product
            .velocity
            .unwrap_or_else(|| classify_velocity(series, &self.config.classification))
    }

    /// Forecast demand over the `horizon_days` days starting at the run date.
    pub fn forecast(
        &self,
        store_id: &StoreId,
        product_id: &ProductId,
        horizon_days: u32,
    ) -> Result<ForecastResult> {
        let product = self.product(product_id)?;
        let series = self.demand_series(store_id, product_id)?;
        let velocity = self.velocity_of(product, &series);
        self.forecast_series(store_id, product_id, &series, velocity, horizon_days)
    }

    fn forecast_series(
        &self,
        store_id: &StoreId,
        product_id: &ProductId,
        series: &DemandSeries,
        velocity: VelocityCategory,
        horizon_days: u32,
    ) -> Result<ForecastResult> {
        let horizon = Horizon::new(self.as_of, horizon_days)?;
        let params = self.config.velocity.get(velocity);
        let seasonality = &self.config.seasonality;

        let history = if self.config.forecasting.deseasonalize_history {
            series.deseasonalized(|month| seasonality.factor_for(product_id, month))
        } else {
            series.values().to_vec()
        };

        let period_days = series.period().average_days();
        let periods_ahead = (f64::from(horizon_days) / period_days).ceil().max(1.0) as usize;

        let output = Ensemble::for_velocity(params, &self.config.forecasting)
            .combine(&history, periods_ahead)
            .map_err(|e| match e {
                ReplenishError::InsufficientData { .. } => ReplenishError::NoForecastAvailable {
                    store_id: store_id.to_string(),
                    product_id: product_id.to_string(),
                },
                other => other,
            })?;

        let seasonal_factor = seasonality.horizon_factor(product_id, &horizon);
        let daily_demand = (output.base_per_period * seasonal_factor / period_days).max(0.0);
        let predicted_demand = (daily_demand * f64::from(horizon_days)).round().max(0.0) as u64;
        let confidence =
            confidence_score(series.observed_periods(), &output.estimates(), velocity);

        debug!(
            store = %store_id,
            product = %product_id,
            %velocity,
            base = output.base_per_period,
            seasonal_factor,
            predicted_demand,
            "forecast"
        );

        Ok(ForecastResult {
            store_id: store_id.clone(),
            product_id: product_id.clone(),
            forecast_date: self.as_of,
            horizon,
            velocity,
            base_per_period: output.base_per_period,
            seasonal_factor,
            daily_demand,
            predicted_demand,
            confidence_score: confidence,
            history_periods: series.len(),
            contributions: output.contributions,
        })
    }

    /// Forecast over the product's target cover and size an order.
    pub fn recommend_reorder(
        &self,
        store_id: &StoreId,
        product_id: &ProductId,
    ) -> Result<ReorderRecommendation> {
        self.evaluate(store_id, product_id).map(|(_, rec)| rec)
    }

    fn evaluate(
        &self,
        store_id: &StoreId,
        product_id: &ProductId,
    ) -> Result<(ForecastResult, ReorderRecommendation)> {
        let product = self.product(product_id)?;

        let snapshot = self
            .inventory
            .snapshot(store_id, product_id)?
            .unwrap_or_else(|| InventorySnapshot::empty(store_id.clone(), product_id.clone()));
        snapshot.validate()?;

        let series = self.demand_series(store_id, product_id)?;
        let velocity = self.velocity_of(product, &series);
        let params = self.config.velocity.get(velocity);
        let cover_days = params.target_cover_days.ceil().max(1.0) as u32;

        let forecast = self.forecast_series(store_id, product_id, &series, velocity, cover_days)?;
        let lead_time = self
            .config
            .lead_times
            .for_supplier(product.supplier.as_deref());
        let rec = self.calculator.calculate(&forecast, &snapshot, lead_time, params);
        Ok((forecast, rec))
    }

    /// Why a product is or is not on the reorder list.
    pub fn explain(&self, store_id: &StoreId, product_id: &ProductId) -> Result<Explanation> {
        let product = self.product(product_id)?;
        let matching_rule = self.exclusions.first_match(product).cloned();

        let mut explanation = Explanation {
            store_id: store_id.clone(),
            product_id: product_id.clone(),
            description: product.description.clone(),
            included: false,
            matching_rule,
            velocity: None,
            contributing_forecasters: Vec::new(),
            contributions: Vec::new(),
            confidence: 0.0,
            action: None,
            issue: None,
        };

        match self.evaluate(store_id, product_id) {
            Ok((forecast, rec)) => {
                explanation.velocity = Some(forecast.velocity);
                explanation.contributing_forecasters = forecast.contributing_methods();
                explanation.contributions = forecast.contributions;
                explanation.confidence = forecast.confidence_score;
                explanation.action = Some(rec.action);
                explanation.included = explanation.matching_rule.is_none();
            }
            Err(
                e @ (ReplenishError::NoForecastAvailable { .. }
                | ReplenishError::DataIntegrity { .. }),
            ) => explanation.issue = Some(e.to_string()),
            Err(e) => return Err(e),
        }

        Ok(explanation)
    }

    fn candidates(&self, filters: &ReorderFilters) -> Vec<(&StoreId, &Product)> {
        self.stores
            .iter()
            .filter(|s| filters.matches_store(s))
            .flat_map(move |store| {
                self.catalog
                    .iter()
                    .filter(move |p| filters.matches_product(p))
                    .map(move |product| (store, product))
            })
            .collect()
    }

    /// Forecast every (store, product) over `horizon_days`.
    pub fn forecast_batch(
        &self,
        filters: &ReorderFilters,
        horizon_days: u32,
    ) -> (Vec<ForecastResult>, Vec<BatchFailure>) {
        let outcomes: Vec<_> = self
            .candidates(filters)
            .into_par_iter()
            .map(|(store, product)| {
                (store, product, self.forecast(store, &product.id, horizon_days))
            })
            .collect();

        let mut forecasts = Vec::new();
        let mut failures = Vec::new();
        for (store, product, outcome) in outcomes {
            match outcome {
                Ok(forecast) => forecasts.push(forecast),
                Err(error) => failures.push(BatchFailure {
                    store_id: store.clone(),
                    product_id: product.id.clone(),
                    error,
                }),
            }
        }
        (forecasts, failures)
    }

    /// Prioritised reorder list for every store and product passing `filters`.
    ///
    /// Individual failures are collected, never fatal. Excluded products are
    /// still evaluated and reported with their matching rule.
    pub fn batch_reorder_list(&self, filters: &ReorderFilters) -> BatchReport {
        let outcomes: Vec<_> = self
            .candidates(filters)
            .into_par_iter()
            .map(|(store, product)| (store, product, self.recommend_reorder(store, &product.id)))
            .collect();

        let mut evaluated = Vec::new();
        let mut failures = Vec::new();
        for (store, product, outcome) in outcomes {
            match outcome {
                Ok(rec) => evaluated.push(rec),
                Err(error) => {
                    if error.is_data_integrity() {
                        warn!(store = %store, product = %product.id, %error, "data anomaly");
                    } else {
                        debug!(store = %store, product = %product.id, %error, "no recommendation");
                    }
                    failures.push(BatchFailure {
                        store_id: store.clone(),
                        product_id: product.id.clone(),
                        error,
                    });
                }
            }
        }

        let split = self
            .exclusions
            .partition(evaluated, |rec| self.catalog.get(&rec.product_id));

        let excluded: Vec<ExcludedItem> = split
            .removed
            .into_iter()
            .filter_map(|rec| {
                let rule = self
                    .catalog
                    .get(&rec.product_id)
                    .and_then(|p| self.exclusions.first_match(p))
                    .cloned()?;
                Some(ExcludedItem {
                    recommendation: rec,
                    rule,
                })
            })
            .collect();

        let mut recommendations: Vec<ReorderRecommendation> = split
            .kept
            .into_iter()
            .filter(|rec| filters.matches_recommendation(rec))
            .collect();
        recommendations.sort_by(compare_recommendations);

        info!(
            recommendations = recommendations.len(),
            excluded = excluded.len(),
            failures = failures.len(),
            "batch reorder list built"
        );

        BatchReport {
            recommendations,
            excluded,
            failures,
        }
    }
}

/// Priority ascending, then soonest stockout (none last), then store and item.
fn compare_recommendations(a: &ReorderRecommendation, b: &ReorderRecommendation) -> Ordering {
    a.priority()
        .cmp(&b.priority())
        .then_with(|| match (a.days_until_stockout, b.days_until_stockout) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.store_id.cmp(&b.store_id))
        .then_with(|| a.product_id.cmp(&b.product_id))
}
