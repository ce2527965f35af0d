use crate::core::{Product, ProductId, ProductStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

const EARLIEST_YEAR: i32 = 1900;
const LATEST_YEAR: i32 = 2099;

/// One reason to keep a product off the reorder list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", content = "value")]
pub enum ExclusionRule {
    /// Description names a year before `current_year` ("2023 Calendar").
    DateRule { current_year: i32 },
    /// Case-insensitive substring of the description.
    KeywordRule(String),
    /// Exact item number.
    ItemNumberRule(ProductId),
    /// Sells below cost.
    MarginRule,
    StatusRule(Vec<ProductStatus>),
}

impl ExclusionRule {
    pub fn keyword(keyword: impl Into<String>) -> Self {
        ExclusionRule::KeywordRule(keyword.into())
    }

    pub fn item_number(id: impl Into<ProductId>) -> Self {
        ExclusionRule::ItemNumberRule(id.into())
    }

    pub fn matches(&self, product: &Product) -> bool {
        match self {
            ExclusionRule::DateRule { current_year } => {
                years_in(&product.description).any(|year| year < *current_year)
            }
            ExclusionRule::KeywordRule(keyword) => product
                .description
                .to_lowercase()
                .contains(&keyword.to_lowercase()),
            ExclusionRule::ItemNumberRule(id) => product.id == *id,
            ExclusionRule::MarginRule => product.unit_margin().is_some_and(|m| m < 0.0),
            ExclusionRule::StatusRule(statuses) => statuses.contains(&product.status),
        }
    }
}

impl fmt::Display for ExclusionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionRule::DateRule { current_year } => {
                write!(f, "DateRule(before {current_year})")
            }
            ExclusionRule::KeywordRule(keyword) => write!(f, "KeywordRule({keyword:?})"),
            ExclusionRule::ItemNumberRule(id) => write!(f, "ItemNumberRule({id})"),
            ExclusionRule::MarginRule => f.write_str("MarginRule"),
            ExclusionRule::StatusRule(statuses) => write!(f, "StatusRule({statuses:?})"),
        }
    }
}

/// Standalone four-digit numbers in a plausible calendar range.
///
/// Digits that are part of a longer number ("12345") are not years.
fn years_in(text: &str) -> impl Iterator<Item = i32> + '_ {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|token| token.len() == 4)
        .filter_map(|token| token.parse::<i32>().ok())
        .filter(|year| (EARLIEST_YEAR..=LATEST_YEAR).contains(year))
}
