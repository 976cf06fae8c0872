//! Purchase store.
//!
//! Checkout loading/error state plus the orchestration around the
//! purchase collaborator: a successful order resets the buyer's cart and
//! raises a success toast; a failure records the error and raises an
//! error toast. Nothing is retried automatically - retry is the user
//! pressing the button again.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{instrument, warn};

use peachstand_core::User;

use crate::api::{Order, PurchaseApi, Receipt};
use crate::cart::CartStore;
use crate::error::Result;
use crate::toast::{ToastKind, ToastStore};

/// Observable checkout state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PurchaseSnapshot {
    /// An order is in flight.
    pub is_loading: bool,
    /// Last failure, cleared when a new order starts.
    pub error: Option<String>,
}

/// The purchase state container.
#[derive(Clone)]
pub struct PurchaseStore {
    inner: Arc<PurchaseInner>,
}

struct PurchaseInner {
    api: Arc<dyn PurchaseApi>,
    cart: CartStore,
    toast: ToastStore,
    state: watch::Sender<PurchaseSnapshot>,
}

impl PurchaseStore {
    /// Create a purchase store wired to the cart and toast stores it
    /// drives on completion.
    #[must_use]
    pub fn new(api: Arc<dyn PurchaseApi>, cart: CartStore, toast: ToastStore) -> Self {
        let (state, _) = watch::channel(PurchaseSnapshot::default());
        Self {
            inner: Arc::new(PurchaseInner {
                api,
                cart,
                toast,
                state,
            }),
        }
    }

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> PurchaseSnapshot {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to state transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PurchaseSnapshot> {
        self.inner.state.subscribe()
    }

    /// Place an order for the user's current cart.
    ///
    /// On success the cart is reset (memory and durable copy) and a
    /// success toast is shown; the caller handles navigation.
    ///
    /// # Errors
    ///
    /// Returns the collaborator error after recording it and showing an
    /// error toast.
    #[instrument(skip(self, order, user), fields(user_id = %user.id))]
    pub async fn place_order(&self, order: &Order, user: &User) -> Result<Receipt> {
        self.inner.state.send_replace(PurchaseSnapshot {
            is_loading: true,
            error: None,
        });

        let cart_items = self.inner.cart.snapshot().items;
        let result = self
            .inner
            .api
            .make_purchase(order, &user.id, &cart_items)
            .await;

        match result {
            Ok(receipt) => {
                if let Err(e) = self.inner.cart.reset_cart(&user.id) {
                    // The order went through; an unreset durable cart is
                    // recoverable on the next init
                    warn!(error = %e, "failed to reset cart after purchase");
                }
                self.inner.state.send_replace(PurchaseSnapshot::default());
                self.inner.toast.show("Purchase complete", ToastKind::Success);
                Ok(receipt)
            }
            Err(e) => {
                self.inner.state.send_replace(PurchaseSnapshot {
                    is_loading: false,
                    error: Some(e.to_string()),
                });
                self.inner
                    .toast
                    .show("Purchase failed, please try again", ToastKind::Error);
                Err(e.into())
            }
        }
    }
}
