//! Exponential smoothing forecasters.
//!
//! - Simple Exponential Smoothing (SES)
//! - Holt's Linear Trend

mod holt;
mod ses;

pub use holt::HoltLinearTrend;
pub use ses::SimpleExponentialSmoothing;
