//! Product listing filter criteria.

use serde::{Deserialize, Serialize};

use super::id::CategoryId;
use super::price::Price;

/// Query criteria for the product listing.
///
/// A pure value object: the filter store assigns fields, consumers observe
/// changes and reload the listing. `None` means "unset" for the price
/// bounds and "all categories" for the category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProductFilter {
    /// Lower price bound, inclusive.
    pub min_price: Option<Price>,
    /// Upper price bound, inclusive.
    pub max_price: Option<Price>,
    /// Case-insensitive title substring.
    pub title: String,
    /// Restrict to one category; `None` means all categories.
    pub category: Option<CategoryId>,
}

impl ProductFilter {
    /// Whether every criterion is at its default (no filtering).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min_price.is_none()
            && self.max_price.is_none()
            && self.title.is_empty()
            && self.category.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(ProductFilter::default().is_empty());
    }

    #[test]
    fn test_any_criterion_makes_it_non_empty() {
        let filter = ProductFilter {
            title: "mug".to_owned(),
            ..ProductFilter::default()
        };
        assert!(!filter.is_empty());

        let filter = ProductFilter {
            min_price: Some(Price::new(100)),
            ..ProductFilter::default()
        };
        assert!(!filter.is_empty());
    }
}
