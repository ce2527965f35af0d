//! Current stock positions.

use crate::core::product::{ProductId, StoreId};
use crate::error::{ReplenishError, Result};
use serde::{Deserialize, Serialize};

/// Stock position of a product at a store at run time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub store_id: StoreId,
    pub product_id: ProductId,
    pub quantity_on_hand: i64,
    #[serde(default)]
    pub quantity_reserved: i64,
}

impl InventorySnapshot {
    pub fn new(
        store_id: impl Into<StoreId>,
        product_id: impl Into<ProductId>,
        quantity_on_hand: i64,
        quantity_reserved: i64,
    ) -> Self {
        Self {
            store_id: store_id.into(),
            product_id: product_id.into(),
            quantity_on_hand,
            quantity_reserved,
        }
    }

    /// A position with nothing on hand, used when the reader has no record.
    pub fn empty(store_id: StoreId, product_id: ProductId) -> Self {
        Self {
            store_id,
            product_id,
            quantity_on_hand: 0,
            quantity_reserved: 0,
        }
    }

    /// Check the write-time contract: non-negative quantities, reserved <= on hand.
    pub fn validate(&self) -> Result<()> {
        let reason = if self.quantity_on_hand < 0 {
            Some(format!("negative on-hand quantity {}", self.quantity_on_hand))
        } else if self.quantity_reserved < 0 {
            Some(format!(
                "negative reserved quantity {}",
                self.quantity_reserved
            ))
        } else if self.quantity_reserved > self.quantity_on_hand {
            Some(format!(
                "reserved {} exceeds on hand {}",
                self.quantity_reserved, self.quantity_on_hand
            ))
        } else {
            None
        };

        match reason {
            Some(reason) => Err(ReplenishError::DataIntegrity {
                store_id: self.store_id.to_string(),
                product_id: self.product_id.to_string(),
                reason,
            }),
            None => Ok(()),
        }
    }

    /// On hand minus reserved, never negative.
    pub fn quantity_available(&self) -> u64 {
        (self.quantity_on_hand - self.quantity_reserved).max(0) as u64
    }
}
