//! Reorder decisions: quantities, urgency and the roll-ups buyers work from.

mod action;
mod calculator;
mod summary;

pub use action::{ReorderAction, UrgentReason};
pub use calculator::{ReorderCalculator, ReorderRecommendation};
pub use summary::{PurchaseOrder, PurchaseOrderLine, ReorderSummary};
