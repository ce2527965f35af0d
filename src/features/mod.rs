//! Features derived from a product's demand history.
//!
//! # Example
//!
//! ```
//! use anofox_replenish::features::{mann_kendall_tau, TrendDirection, TrendTest};
//!
//! let history = vec![4.0, 5.0, 7.0, 8.0, 11.0, 12.0];
//! assert!(mann_kendall_tau(&history) > 0.9);
//! assert_eq!(TrendTest::default().detect(&history), TrendDirection::Increasing);
//! ```

pub mod trend;
pub mod velocity;

pub use trend::{mann_kendall_tau, TrendDirection, TrendTest};
pub use velocity::classify_velocity;
