//! Product catalog, identifiers and velocity classes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Identifier of a store (branch, webstore, ...).
    StoreId
);

string_id!(
    /// Identifier of a product; the retailer's item number.
    ProductId
);

/// Classification of a product by sales speed.
///
/// Drives which base forecasters dominate the ensemble and which
/// safety-stock and order-horizon parameters apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VelocityCategory {
    FastMover,
    MediumMover,
    SlowMover,
    VerySlowMover,
}

impl VelocityCategory {
    /// All categories, fastest first.
    pub const ALL: [VelocityCategory; 4] = [
        VelocityCategory::FastMover,
        VelocityCategory::MediumMover,
        VelocityCategory::SlowMover,
        VelocityCategory::VerySlowMover,
    ];

    /// The next slower category (saturates at `VerySlowMover`).
    pub fn slower(self) -> Self {
        match self {
            VelocityCategory::FastMover => VelocityCategory::MediumMover,
            VelocityCategory::MediumMover => VelocityCategory::SlowMover,
            VelocityCategory::SlowMover | VelocityCategory::VerySlowMover => {
                VelocityCategory::VerySlowMover
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VelocityCategory::FastMover => "Fast Mover",
            VelocityCategory::MediumMover => "Medium Mover",
            VelocityCategory::SlowMover => "Slow Mover",
            VelocityCategory::VerySlowMover => "Very Slow Mover",
        }
    }
}

impl fmt::Display for VelocityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle status of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    Active,
    Discontinued,
    /// Non-stock service line (engraving, shipping, gift wrap).
    Service,
    Inactive,
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub description: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub unit_cost: Option<f64>,
    #[serde(default)]
    pub unit_price: Option<f64>,
    #[serde(default)]
    pub status: ProductStatus,
    /// Explicit velocity class; classified from history when absent.
    #[serde(default)]
    pub velocity: Option<VelocityCategory>,
}

impl Product {
    pub fn new(id: impl Into<ProductId>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            brand: None,
            supplier: None,
            unit_cost: None,
            unit_price: None,
            status: ProductStatus::Active,
            velocity: None,
        }
    }

    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }

    pub fn with_pricing(mut self, unit_cost: f64, unit_price: f64) -> Self {
        self.unit_cost = Some(unit_cost);
        self.unit_price = Some(unit_price);
        self
    }

    pub fn with_status(mut self, status: ProductStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_velocity(mut self, velocity: VelocityCategory) -> Self {
        self.velocity = Some(velocity);
        self
    }

    /// Unit margin (price - cost), when both are known.
    pub fn unit_margin(&self) -> Option<f64> {
        match (self.unit_price, self.unit_cost) {
            (Some(price), Some(cost)) => Some(price - cost),
            _ => None,
        }
    }
}

/// Product catalog indexed by item number.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog; later duplicates of an item number replace earlier ones.
    pub fn new(products: Vec<Product>) -> Self {
        let mut catalog = Self::default();
        for product in products {
            catalog.insert(product);
        }
        catalog
    }

    pub fn insert(&mut self, product: Product) {
        match self.index.get(&product.id) {
            Some(&pos) => self.products[pos] = product,
            None => {
                self.index.insert(product.id.clone(), self.products.len());
                self.products.push(product);
            }
        }
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.index.get(id).map(|&pos| &self.products[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
