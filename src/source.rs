//! Data sources the engine reads from.
//!
//! Everything is loaded into memory before a run. The reader traits are the
//! seam for other back ends; the in-memory implementations back the binary
//! and the tests.

use crate::core::{DateRange, InventorySnapshot, Product, ProductId, SalesObservation, StoreId};
use crate::error::{ReplenishError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Yields sales for one (store, product). Missing data is an empty list.
pub trait SalesHistoryReader: Send + Sync {
    fn observations(
        &self,
        store: &StoreId,
        product: &ProductId,
        range: DateRange,
    ) -> Result<Vec<SalesObservation>>;
}

/// Yields the current stock position for one (store, product).
pub trait InventoryReader: Send + Sync {
    /// `None` when there is no record; the engine treats that as nothing on hand.
    fn snapshot(&self, store: &StoreId, product: &ProductId) -> Result<Option<InventorySnapshot>>;
}

type SeriesKey = (StoreId, ProductId);

/// Catalog, stores, sales and inventory, in the order the engine takes them.
pub type SnapshotParts = (Vec<Product>, Vec<StoreId>, InMemorySalesHistory, InMemoryInventory);

/// Sales history held in memory, grouped per series and ordered by date.
#[derive(Debug, Clone, Default)]
pub struct InMemorySalesHistory {
    series: HashMap<SeriesKey, Vec<SalesObservation>>,
}

impl InMemorySalesHistory {
    pub fn new(observations: Vec<SalesObservation>) -> Self {
        let mut series: HashMap<SeriesKey, Vec<SalesObservation>> = HashMap::new();
        for obs in observations {
            series
                .entry((obs.store_id.clone(), obs.product_id.clone()))
                .or_default()
                .push(obs);
        }
        for list in series.values_mut() {
            list.sort_by_key(|o| o.date);
        }
        Self { series }
    }

    /// Stores with at least one observation, sorted.
    pub fn stores(&self) -> Vec<StoreId> {
        let mut stores: Vec<StoreId> = self.series.keys().map(|(s, _)| s.clone()).collect();
        stores.sort();
        stores.dedup();
        stores
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }
}

impl SalesHistoryReader for InMemorySalesHistory {
    fn observations(
        &self,
        store: &StoreId,
        product: &ProductId,
        range: DateRange,
    ) -> Result<Vec<SalesObservation>> {
        let key = (store.clone(), product.clone());
        Ok(self
            .series
            .get(&key)
            .map(|list| {
                list.iter()
                    .filter(|o| range.contains(o.date))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// Inventory positions held in memory. A later record for the same
/// (store, product) replaces an earlier one.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventory {
    positions: HashMap<SeriesKey, InventorySnapshot>,
}

impl InMemoryInventory {
    pub fn new(snapshots: Vec<InventorySnapshot>) -> Self {
        let positions = snapshots
            .into_iter()
            .map(|s| ((s.store_id.clone(), s.product_id.clone()), s))
            .collect();
        Self { positions }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl InventoryReader for InMemoryInventory {
    fn snapshot(&self, store: &StoreId, product: &ProductId) -> Result<Option<InventorySnapshot>> {
        Ok(self
            .positions
            .get(&(store.clone(), product.clone()))
            .cloned())
    }
}

/// Everything a run needs, as one JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub products: Vec<Product>,
    /// Stores to plan for; defaults to every store with sales.
    #[serde(default)]
    pub stores: Vec<StoreId>,
    #[serde(default)]
    pub sales: Vec<SalesObservation>,
    #[serde(default)]
    pub inventory: Vec<InventorySnapshot>,
}

impl Snapshot {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ReplenishError::ConfigLoad(format!("snapshot: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ReplenishError::ConfigLoad(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    /// Split into the pieces the engine takes.
    pub fn into_parts(self) -> SnapshotParts {
        let sales = InMemorySalesHistory::new(self.sales);
        let stores = if self.stores.is_empty() {
            sales.stores()
        } else {
            self.stores
        };
        (
            self.products,
            stores,
            sales,
            InMemoryInventory::new(self.inventory),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn sales_are_grouped_and_ranged() {
        let history = InMemorySalesHistory::new(vec![
            SalesObservation::new("49", "1", date(2024, 3, 5), 2),
            SalesObservation::new("49", "1", date(2024, 1, 5), 4),
            SalesObservation::new("50", "1", date(2024, 2, 5), 1),
        ]);
        assert_eq!(history.series_count(), 2);
        assert_eq!(history.stores(), vec![StoreId::new("49"), StoreId::new("50")]);

        let all = history
            .observations(
                &StoreId::new("49"),
                &ProductId::new("1"),
                DateRange::new(date(2024, 1, 1), date(2024, 12, 1)),
            )
            .unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].date < all[1].date);

        let february = history
            .observations(
                &StoreId::new("49"),
                &ProductId::new("1"),
                DateRange::new(date(2024, 2, 1), date(2024, 3, 1)),
            )
            .unwrap();
        assert!(february.is_empty());
    }

    #[test]
    fn missing_series_is_empty_not_an_error() {
        let history = InMemorySalesHistory::default();
        let obs = history
            .observations(
                &StoreId::new("49"),
                &ProductId::new("x"),
                DateRange::new(date(2024, 1, 1), date(2024, 2, 1)),
            )
            .unwrap();
        assert!(obs.is_empty());
    }

    #[test]
    fn later_inventory_record_wins() {
        let inventory = InMemoryInventory::new(vec![
            InventorySnapshot::new("49", "1", 5, 0),
            InventorySnapshot::new("49", "1", 8, 1),
        ]);
        assert_eq!(inventory.len(), 1);
        let snap = inventory
            .snapshot(&StoreId::new("49"), &ProductId::new("1"))
            .unwrap()
            .unwrap();
        assert_eq!(snap.quantity_on_hand, 8);
        assert!(inventory
            .snapshot(&StoreId::new("49"), &ProductId::new("2"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn snapshot_from_json_defaults_stores_to_sales() {
        let json = r#"{
            "products": [{ "id": "1", "description": "Puffin Mug" }],
            "sales": [
                { "store_id": "49", "product_id": "1", "date": "2024-05-03", "quantity_sold": 3 }
            ],
            "inventory": [
                { "store_id": "49", "product_id": "1", "quantity_on_hand": 7 }
            ]
        }"#;
        let snapshot = Snapshot::from_json_str(json).unwrap();
        let (products, stores, sales, inventory) = snapshot.into_parts();
        assert_eq!(products.len(), 1);
        assert_eq!(stores, vec![StoreId::new("49")]);
        assert_eq!(sales.series_count(), 1);
        assert_eq!(inventory.len(), 1);
    }

    #[test]
    fn bad_snapshot_is_a_load_error() {
        assert!(matches!(
            Snapshot::from_json_str("[]"),
            Err(ReplenishError::ConfigLoad(_))
        ));
    }
}
