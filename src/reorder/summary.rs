//! Roll-ups over a reorder list: headline counts and a purchase-order draft.

use crate::config::ReorderPolicy;
use crate::core::{Catalog, ProductId, StoreId};
use crate::reorder::{ReorderAction, ReorderRecommendation};
use serde::Serialize;

/// Headline counts for a reorder list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReorderSummary {
    pub items: usize,
    /// Out of stock, or stocking out before delivery.
    pub critical: usize,
    pub order_soon: usize,
    pub monitor: usize,
    pub ok: usize,
    pub overstock: usize,
    /// Items with less than `at_risk_days` of cover.
    pub at_risk: usize,
    /// Sum of recommended order quantities.
    pub total_units: u64,
}

impl ReorderSummary {
    pub fn from_recommendations(recs: &[ReorderRecommendation], policy: &ReorderPolicy) -> Self {
        let mut summary = Self {
            items: recs.len(),
            ..Self::default()
        };

        for rec in recs {
            match rec.action {
                ReorderAction::Urgent { .. } => summary.critical += 1,
                ReorderAction::ReorderSoon => summary.order_soon += 1,
                ReorderAction::Monitor => summary.monitor += 1,
                ReorderAction::Ok => summary.ok += 1,
                ReorderAction::Overstock => summary.overstock += 1,
            }
            if rec
                .days_until_stockout
                .is_some_and(|days| days < policy.at_risk_days)
            {
                summary.at_risk += 1;
            }
            summary.total_units += rec.order_quantity;
        }

        summary
    }
}

/// One line of a draft purchase order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseOrderLine {
    pub store_id: StoreId,
    pub product_id: ProductId,
    pub description: String,
    pub supplier: Option<String>,
    pub quantity: u64,
}

/// Draft purchase order built from selected recommendations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PurchaseOrder {
    pub lines: Vec<PurchaseOrderLine>,
}

impl PurchaseOrder {
    /// Order lines for the selected item numbers, or every item when
    /// `selected` is empty. Lines with nothing to order are skipped.
    pub fn draft(
        recs: &[ReorderRecommendation],
        catalog: &Catalog,
        selected: &[ProductId],
    ) -> Self {
        let lines = recs
            .iter()
            .filter(|rec| rec.order_quantity > 0)
            .filter(|rec| selected.is_empty() || selected.contains(&rec.product_id))
            .map(|rec| {
                let product = catalog.get(&rec.product_id);
                PurchaseOrderLine {
                    store_id: rec.store_id.clone(),
                    product_id: rec.product_id.clone(),
                    description: product.map(|p| p.description.clone()).unwrap_or_default(),
                    supplier: product.and_then(|p| p.supplier.clone()),
                    quantity: rec.order_quantity,
                }
            })
            .collect();

        Self { lines }
    }

    pub fn total_units(&self) -> u64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
