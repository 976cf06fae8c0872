//! Filter store.
//!
//! Holds the current listing query criteria. Every setter is a pure
//! assignment; the store knows nothing about products. Consumers observe
//! changes through [`subscribe`](FilterStore::subscribe) and trigger an
//! initial listing reload themselves - a one-way dependency that keeps
//! this store composable and independently testable.

use tokio::sync::watch;

use peachstand_core::{CategoryId, Price, ProductFilter};

/// The filter state container.
#[derive(Clone)]
pub struct FilterStore {
    state: watch::Sender<ProductFilter>,
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterStore {
    /// Create a filter store with default criteria (no filtering).
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(ProductFilter::default());
        Self { state }
    }

    /// Current criteria.
    #[must_use]
    pub fn snapshot(&self) -> ProductFilter {
        self.state.borrow().clone()
    }

    /// Subscribe to criteria changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ProductFilter> {
        self.state.subscribe()
    }

    /// Set the lower price bound; `None` means unset.
    pub fn set_min_price(&self, min_price: Option<Price>) {
        self.state.send_modify(|f| f.min_price = min_price);
    }

    /// Set the upper price bound; `None` means unset.
    pub fn set_max_price(&self, max_price: Option<Price>) {
        self.state.send_modify(|f| f.max_price = max_price);
    }

    /// Set the title substring.
    pub fn set_title(&self, title: impl Into<String>) {
        let title = title.into();
        self.state.send_modify(|f| f.title = title);
    }

    /// Restrict to one category; `None` means all categories.
    pub fn set_category(&self, category: Option<CategoryId>) {
        self.state.send_modify(|f| f.category = category);
    }

    /// Restore all criteria to their defaults.
    pub fn reset(&self) {
        self.state.send_replace(ProductFilter::default());
    }
}
