//! Utility functions shared by the forecasters and the ledger.

pub mod metrics;
pub mod stats;

pub use metrics::{calculate_metrics, AccuracyMetrics};
pub use stats::{coefficient_of_variation, mean, population_std_dev};
