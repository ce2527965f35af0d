//! Month-of-year seasonal profiles.

use crate::core::{Horizon, ProductId};
use crate::error::{ReplenishError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Twelve monthly demand multipliers, January first.
///
/// The factor is a step function of the calendar month: there is no
/// smoothing across month boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeasonalProfile([f64; 12]);

impl SeasonalProfile {
    pub fn new(factors: [f64; 12]) -> Result<Self> {
        let profile = Self(factors);
        profile.validate()?;
        Ok(profile)
    }

    /// Newfoundland & Labrador tourism pattern (cruise and summer traffic).
    pub fn newfoundland_tourism() -> Self {
        Self([0.4, 0.4, 0.5, 0.7, 0.9, 1.3, 1.6, 1.5, 1.2, 0.8, 0.5, 0.6])
    }

    /// No seasonality: every month is 1.0.
    pub fn flat() -> Self {
        Self([1.0; 12])
    }

    /// Multiplier for a calendar month (1-12).
    pub fn factor(&self, month: u32) -> f64 {
        self.0[(month.clamp(1, 12) - 1) as usize]
    }

    pub fn factors(&self) -> &[f64; 12] {
        &self.0
    }

    /// Horizon factor: month factors weighted by the share of days in each month.
    pub fn horizon_factor(&self, horizon: &Horizon) -> f64 {
        horizon
            .month_fractions()
            .iter()
            .map(|(month, share)| self.factor(*month) * share)
            .sum()
    }

    pub fn validate(&self) -> Result<()> {
        for (i, f) in self.0.iter().enumerate() {
            if !f.is_finite() || *f <= 0.0 {
                return Err(ReplenishError::InvalidConfiguration(format!(
                    "seasonal factor for month {} must be positive, got {}",
                    i + 1,
                    f
                )));
            }
        }
        Ok(())
    }
}

impl Default for SeasonalProfile {
    fn default() -> Self {
        Self::newfoundland_tourism()
    }
}

/// Global seasonal profile plus per-product overrides.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeasonalityModel {
    #[serde(default)]
    pub global: SeasonalProfile,
    /// Products whose demand does not follow the global pattern.
    #[serde(default)]
    pub overrides: HashMap<ProductId, SeasonalProfile>,
}

impl SeasonalityModel {
    pub fn new(global: SeasonalProfile) -> Self {
        Self {
            global,
            overrides: HashMap::new(),
        }
    }

    pub fn with_override(
        mut self,
        product: impl Into<ProductId>,
        profile: SeasonalProfile,
    ) -> Self {
        self.overrides.insert(product.into(), profile);
        self
    }

    /// Profile for a product, falling back to the global one.
    pub fn profile_for(&self, product: &ProductId) -> &SeasonalProfile {
        self.overrides.get(product).unwrap_or(&self.global)
    }

    /// Global factor for a calendar month.
    pub fn factor(&self, month: u32) -> f64 {
        self.global.factor(month)
    }

    pub fn factor_for(&self, product: &ProductId, month: u32) -> f64 {
        self.profile_for(product).factor(month)
    }

    pub fn horizon_factor(&self, product: &ProductId, horizon: &Horizon) -> f64 {
        self.profile_for(product).horizon_factor(horizon)
    }

    pub fn validate(&self) -> Result<()> {
        self.global.validate()?;
        for profile in self.overrides.values() {
            profile.validate()?;
        }
        Ok(())
    }
}
