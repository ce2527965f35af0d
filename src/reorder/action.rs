use serde::{Deserialize, Serialize};
use std::fmt;

/// Why an item needs ordering immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgentReason {
    OutOfStock,
    WillStockOutBeforeDelivery,
}

/// What to do about one (store, product).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReorderAction {
    Urgent { reason: UrgentReason },
    ReorderSoon,
    /// Below the reorder point, outside the reorder-soon window.
    Monitor,
    Ok,
    Overstock,
}

impl ReorderAction {
    pub const OUT_OF_STOCK: ReorderAction = ReorderAction::Urgent {
        reason: UrgentReason::OutOfStock,
    };
    pub const STOCKOUT_BEFORE_DELIVERY: ReorderAction = ReorderAction::Urgent {
        reason: UrgentReason::WillStockOutBeforeDelivery,
    };

    /// Sort key, lowest first.
    pub fn priority(self) -> u8 {
        match self {
            ReorderAction::Urgent {
                reason: UrgentReason::OutOfStock,
            } => 1,
            ReorderAction::Urgent {
                reason: UrgentReason::WillStockOutBeforeDelivery,
            } => 2,
            ReorderAction::ReorderSoon => 3,
            ReorderAction::Monitor => 4,
            ReorderAction::Ok => 5,
            ReorderAction::Overstock => 6,
        }
    }

    pub fn is_urgent(self) -> bool {
        matches!(self, ReorderAction::Urgent { .. })
    }

    /// Label shown to buyers.
    pub fn label(self) -> &'static str {
        match self {
            ReorderAction::Urgent {
                reason: UrgentReason::OutOfStock,
            } => "URGENT - OUT OF STOCK",
            ReorderAction::Urgent {
                reason: UrgentReason::WillStockOutBeforeDelivery,
            } => "CRITICAL - ORDER NOW",
            ReorderAction::ReorderSoon => "ORDER SOON",
            ReorderAction::Monitor => "MONITOR CLOSELY",
            ReorderAction::Ok => "OK - SUFFICIENT STOCK",
            ReorderAction::Overstock => "OVERSTOCK",
        }
    }
}

impl fmt::Display for ReorderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
