//! Cross-store scenario tests for Peachstand.
//!
//! Unit tests live next to each store; this crate exercises the seams
//! between them: session restore driving cart init, filter changes
//! driving listing reloads, and checkout fanning out to the cart and
//! toast stores. Collaborators are in-memory fakes with real filtering,
//! pagination, and account bookkeeping, so the scenarios run hermetic
//! and deterministic.
//!
//! # Test Categories
//!
//! - `auth_cart_flow` - login, logout, restore, and per-user cart state
//! - `listing_flow` - pagination, filtering, and debounced search
//! - `checkout_flow` - purchase orchestration across cart and toast

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod fakes;

pub use fakes::{FakeCatalog, FakeIdentity, FakePurchase, PlacedOrder, product};

use std::sync::{Arc, Once};

use peachstand_stores::api::{CatalogApi, IdentityApi, PurchaseApi};
use peachstand_stores::cart::CartStore;
use peachstand_stores::config::StoreConfig;
use peachstand_stores::filter::FilterStore;
use peachstand_stores::product::ProductStore;
use peachstand_stores::purchase::PurchaseStore;
use peachstand_stores::session::SessionStore;
use peachstand_stores::storage::{
    CartStorage, CredentialStore, MemoryCartStorage, MemoryCredentialStore,
};
use peachstand_stores::toast::ToastStore;

static TRACING: Once = Once::new();

/// Install a per-process tracing subscriber for test runs.
///
/// Honors `RUST_LOG`; output is captured per test.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// The full store layer wired over fakes, as an app process would wire
/// it over real collaborators.
pub struct TestStorefront {
    pub config: StoreConfig,
    pub catalog: Arc<FakeCatalog>,
    pub identity: Arc<FakeIdentity>,
    pub purchase_api: Arc<FakePurchase>,
    pub cart_storage: Arc<dyn CartStorage>,
    pub credential_store: Arc<dyn CredentialStore>,
    pub session: SessionStore,
    pub cart: CartStore,
    pub products: ProductStore,
    pub filter: FilterStore,
    pub toast: ToastStore,
    pub purchase: PurchaseStore,
}

impl TestStorefront {
    /// Wire the stores over the given fakes and fresh in-memory storage.
    #[must_use]
    pub fn new(catalog: FakeCatalog, identity: FakeIdentity) -> Self {
        Self::build(
            Arc::new(catalog),
            Arc::new(identity),
            Arc::new(FakePurchase::default()),
            Arc::new(MemoryCartStorage::new()),
            Arc::new(MemoryCredentialStore::new()),
        )
    }

    /// Wire the stores over the given fakes and durable storage.
    #[must_use]
    pub fn with_storage(
        catalog: FakeCatalog,
        identity: FakeIdentity,
        cart_storage: Arc<dyn CartStorage>,
        credential_store: Arc<dyn CredentialStore>,
    ) -> Self {
        Self::build(
            Arc::new(catalog),
            Arc::new(identity),
            Arc::new(FakePurchase::default()),
            cart_storage,
            credential_store,
        )
    }

    /// Rebuild every store over the same collaborators and storage, as a
    /// process restart would. Store state starts over; durable state and
    /// the provider-side session survive.
    #[must_use]
    pub fn restart(&self) -> Self {
        Self::build(
            Arc::clone(&self.catalog),
            Arc::clone(&self.identity),
            Arc::clone(&self.purchase_api),
            Arc::clone(&self.cart_storage),
            Arc::clone(&self.credential_store),
        )
    }

    fn build(
        catalog: Arc<FakeCatalog>,
        identity: Arc<FakeIdentity>,
        purchase_api: Arc<FakePurchase>,
        cart_storage: Arc<dyn CartStorage>,
        credential_store: Arc<dyn CredentialStore>,
    ) -> Self {
        let config = StoreConfig::default();

        let dyn_catalog: Arc<dyn CatalogApi> = catalog.clone();
        let dyn_identity: Arc<dyn IdentityApi> = identity.clone();
        let dyn_purchase: Arc<dyn PurchaseApi> = purchase_api.clone();

        let session = SessionStore::new(dyn_identity, Arc::clone(&credential_store));
        let cart = CartStore::new(Arc::clone(&cart_storage), config.max_line_count);
        let products = ProductStore::new(dyn_catalog);
        let filter = FilterStore::new();
        let toast = ToastStore::new(config.toast_timeout);
        let purchase = PurchaseStore::new(dyn_purchase, cart.clone(), toast.clone());

        Self {
            config,
            catalog,
            identity,
            purchase_api,
            cart_storage,
            credential_store,
            session,
            cart,
            products,
            filter,
            toast,
            purchase,
        }
    }
}
