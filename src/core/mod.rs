//! Core data structures: catalog, sales history, stock positions and forecasts.

mod forecast;
mod inventory;
mod ledger;
mod product;
mod sales;

pub use forecast::{ForecastMethod, ForecastResult, Horizon, MethodContribution};
pub use inventory::InventorySnapshot;
pub use ledger::{ForecastLedger, LedgerEntry};
pub use product::{Catalog, Product, ProductId, ProductStatus, StoreId, VelocityCategory};
pub use sales::{DateRange, DemandSeries, Period, SalesObservation};
