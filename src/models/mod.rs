//! Forecasting models.

mod traits;

pub mod baseline;
pub mod ensemble;
pub mod exponential;

pub use traits::{BoxedForecaster, Forecaster};
