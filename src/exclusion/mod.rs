//! Exclusion rules applied before a product enters the reorder list.
//!
//! Exclusion only hides a product from the list. Its forecast and
//! recommendation are still computed so the matching rule can be explained.

mod rules;

pub use rules::ExclusionRule;

use crate::config::ExclusionConfig;
use crate::core::Product;

/// Items partitioned into those kept and those removed by a filter.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterResult<C> {
    pub kept: Vec<C>,
    pub removed: Vec<C>,
}

/// Active exclusion rules, matched with OR logic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExclusionFilter {
    rules: Vec<ExclusionRule>,
}

impl ExclusionFilter {
    pub fn new(rules: Vec<ExclusionRule>) -> Self {
        Self { rules }
    }

    /// Rules enabled by `config`, with dated items judged against `current_year`.
    pub fn from_config(config: &ExclusionConfig, current_year: i32) -> Self {
        let mut rules = Vec::new();
        if config.exclude_dated {
            rules.push(ExclusionRule::DateRule { current_year });
        }
        if !config.excluded_statuses.is_empty() {
            rules.push(ExclusionRule::StatusRule(config.excluded_statuses.clone()));
        }
        if config.exclude_negative_margin {
            rules.push(ExclusionRule::MarginRule);
        }
        rules.extend(config.keywords.iter().map(ExclusionRule::keyword));
        rules.extend(config.blocked_items.iter().map(|id| ExclusionRule::item_number(id.as_str())));
        Self { rules }
    }

    pub fn rules(&self) -> &[ExclusionRule] {
        &self.rules
    }

    /// The first rule that matches, if any.
    pub fn first_match(&self, product: &Product) -> Option<&ExclusionRule> {
        self.rules.iter().find(|rule| rule.matches(product))
    }

    pub fn is_excluded(&self, product: &Product) -> bool {
        self.first_match(product).is_some()
    }

    /// Split `items` by whether their product is excluded.
    pub fn partition<'p, C, F>(&self, items: Vec<C>, product_of: F) -> FilterResult<C>
    where
        F: Fn(&C) -> Option<&'p Product>,
    {
        let (removed, kept) = items
            .into_iter()
            .partition(|item| product_of(item).is_some_and(|p| self.is_excluded(p)));
        FilterResult { kept, removed }
    }
}
