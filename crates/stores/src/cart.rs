//! Cart store.
//!
//! Owns the authenticated user's cart lines and keeps the durable per-user
//! copy in step with memory. Totals are derived: every mutation recomputes
//! `total_count` and `total_price` from the lines, never patches them
//! incrementally, so they cannot drift.
//!
//! Ordering per mutation: compute the new lines, persist the full snapshot,
//! then publish the in-memory state as one transition. A failed persist
//! leaves the previous snapshot visible, so memory and the durable copy
//! never diverge.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use peachstand_core::{CartItem, Price, Product, ProductId, UserId};

use crate::error::Result;
use crate::storage::CartStorage;

/// Observable cart state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CartSnapshot {
    /// Cart lines, at most one per product identifier.
    pub items: Vec<CartItem>,
    /// Sum of line counts.
    pub total_count: u64,
    /// Sum of line totals.
    pub total_price: Price,
}

impl CartSnapshot {
    fn from_items(items: Vec<CartItem>) -> Self {
        let total_count = items.iter().map(|i| u64::from(i.count)).sum();
        let total_price = items.iter().map(CartItem::line_total).sum();
        Self {
            items,
            total_count,
            total_price,
        }
    }
}

/// The cart state container.
///
/// Cheaply cloneable; all clones share the same state and storage.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartInner>,
}

struct CartInner {
    storage: Arc<dyn CartStorage>,
    max_line_count: u32,
    state: watch::Sender<CartSnapshot>,
}

impl CartStore {
    /// Create a cart store over the given durable storage.
    ///
    /// `max_line_count` is the cumulative per-line quantity cap applied by
    /// [`add_item`](Self::add_item).
    #[must_use]
    pub fn new(storage: Arc<dyn CartStorage>, max_line_count: u32) -> Self {
        let (state, _) = watch::channel(CartSnapshot::default());
        Self {
            inner: Arc::new(CartInner {
                storage,
                max_line_count,
                state,
            }),
        }
    }

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to state transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.inner.state.subscribe()
    }

    /// Load the durable cart for `user_id` into memory.
    ///
    /// Called when a session becomes authenticated. A no-op for an empty
    /// user id (the optimistic-restore window where the user is not yet
    /// known). On a storage failure the in-memory cart is still replaced
    /// with an empty one, so a previous user's lines are never left
    /// visible.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the durable copy could not be read.
    #[instrument(skip(self))]
    pub fn init_cart(&self, user_id: &UserId) -> Result<()> {
        if user_id.is_empty() {
            debug!("no user id yet, skipping cart init");
            return Ok(());
        }

        match self.inner.storage.load(user_id) {
            Ok(items) => {
                debug!(lines = items.len(), "cart loaded");
                self.inner.state.send_replace(CartSnapshot::from_items(items));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to load cart, starting empty");
                self.inner.state.send_replace(CartSnapshot::default());
                Err(e.into())
            }
        }
    }

    /// Clear the durable copy for `user_id` and the in-memory cart.
    ///
    /// Called after a successful purchase.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the durable copy could not be removed;
    /// the in-memory cart is cleared regardless.
    #[instrument(skip(self))]
    pub fn reset_cart(&self, user_id: &UserId) -> Result<()> {
        let result = self.inner.storage.clear(user_id);
        self.inner.state.send_replace(CartSnapshot::default());
        if let Err(e) = &result {
            warn!(error = %e, "failed to clear durable cart");
        }
        result.map_err(Into::into)
    }

    /// Add `count` of `product` to the cart.
    ///
    /// If a line for the product already exists its count is incremented;
    /// otherwise a new line is appended. The accumulated count is clamped
    /// at the configured per-line maximum.
    ///
    /// # Errors
    ///
    /// Returns the storage error if persisting failed; the in-memory cart
    /// is left unchanged in that case.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_item(&self, product: Product, user_id: &UserId, count: u32) -> Result<()> {
        let max = self.inner.max_line_count;
        self.mutate(user_id, move |items| {
            if let Some(line) = items.iter_mut().find(|l| l.product.id == product.id) {
                line.count = line.count.saturating_add(count).min(max);
            } else {
                items.push(CartItem::new(product, count.clamp(1, max)));
            }
        })
    }

    /// Remove the line for `item_id`.
    ///
    /// # Errors
    ///
    /// Returns the storage error if persisting failed.
    #[instrument(skip(self))]
    pub fn remove_item(&self, item_id: &ProductId, user_id: &UserId) -> Result<()> {
        self.mutate(user_id, |items| {
            items.retain(|l| &l.product.id != item_id);
        })
    }

    /// Set the count of the line for `item_id` directly (not additive).
    ///
    /// A no-op if the line is absent. Upper-bound validation is the
    /// caller's responsibility; the quantity cap is a product-policy
    /// decision enforced at the UI boundary, not here.
    ///
    /// # Errors
    ///
    /// Returns the storage error if persisting failed.
    #[instrument(skip(self))]
    pub fn set_item_count(&self, item_id: &ProductId, count: u32, user_id: &UserId) -> Result<()> {
        let present = self
            .inner
            .state
            .borrow()
            .items
            .iter()
            .any(|l| &l.product.id == item_id);
        if !present {
            debug!("no such cart line, ignoring count change");
            return Ok(());
        }

        self.mutate(user_id, |items| {
            if let Some(line) = items.iter_mut().find(|l| &l.product.id == item_id) {
                line.count = count;
            }
        })
    }

    /// Apply `f` to a copy of the lines, persist, then publish.
    fn mutate(&self, user_id: &UserId, f: impl FnOnce(&mut Vec<CartItem>)) -> Result<()> {
        let mut items = self.inner.state.borrow().items.clone();
        f(&mut items);

        if let Err(e) = self.inner.storage.save(user_id, &items) {
            warn!(error = %e, "failed to persist cart, dropping mutation");
            return Err(e.into());
        }

        self.inner.state.send_replace(CartSnapshot::from_items(items));
        Ok(())
    }
}
