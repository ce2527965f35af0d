//! # anofox-replenish
//!
//! Retail demand forecasting and reorder planning.
//!
//! Sales history is bucketed per (store, product) and fed to four base
//! forecasters (simple and weighted moving averages, exponential smoothing,
//! Holt's linear trend). A velocity-keyed ensemble blends them, a monthly
//! seasonal profile scales the result over the planning horizon, and a
//! reorder calculator turns forecast plus stock into an order quantity and
//! an urgency. Exclusion rules keep dated, discontinued or blocked items off
//! the final list while still explaining why.

#![allow(clippy::too_many_arguments)]

pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod exclusion;
pub mod features;
pub mod models;
pub mod reorder;
pub mod seasonality;
pub mod source;
pub mod utils;

pub use error::{ReplenishError, Result};

pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::core::{
        Catalog, ForecastResult, InventorySnapshot, Product, ProductId, SalesObservation, StoreId,
        VelocityCategory,
    };
    pub use crate::engine::{BatchReport, Explanation, ReorderFilters, ReplenishmentEngine};
    pub use crate::error::{ReplenishError, Result};
    pub use crate::exclusion::{ExclusionFilter, ExclusionRule};
    pub use crate::models::Forecaster;
    pub use crate::reorder::{ReorderAction, ReorderRecommendation, ReorderSummary};
    pub use crate::source::{InMemoryInventory, InMemorySalesHistory, Snapshot};
    pub use crate::utils::{calculate_metrics, AccuracyMetrics};
}
