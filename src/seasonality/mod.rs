//! Calendar seasonality.
//!
//! Month-of-year multipliers applied to de-seasonalised forecasts, with a
//! global profile and optional per-product overrides.

mod profile;

pub use profile::{SeasonalProfile, SeasonalityModel};
