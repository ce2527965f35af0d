//! Moving-average forecasters.
//!
//! Simple, low-variance methods that anchor the ensemble for slow movers.

mod sma;
mod wma;

pub use sma::SimpleMovingAverage;
pub use wma::WeightedMovingAverage;
