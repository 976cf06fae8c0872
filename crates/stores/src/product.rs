//! Product listing store.
//!
//! Fetches and accumulates a paginated, filtered product listing from the
//! catalog collaborator. An initial load (first mount, filter change)
//! replaces the listing; a non-initial load ("load more") appends. Page
//! numbering starts at 1 and the caller tracks the current page,
//! advancing it only after a successful append.
//!
//! # Staleness
//!
//! A filter change can issue an initial load while an earlier "load more"
//! is still in flight. Every initial load bumps a generation stamp; any
//! response whose stamp no longer matches the current generation is
//! discarded instead of applied, so the last-issued initial request always
//! wins over earlier in-flight results.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use peachstand_core::{NewProduct, Product, ProductFilter};

use crate::api::CatalogApi;
use crate::error::Result;

/// Observable listing state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingSnapshot {
    /// Accumulated products, in fetch order (server order within a page).
    pub products: Vec<Product>,
    /// Whether another page exists after the last one applied.
    pub has_next_page: bool,
    /// Total products matching the filter, from the last response.
    pub total_count: u64,
    /// A request is in flight.
    pub is_loading: bool,
    /// Last collaborator failure, cleared by the next success.
    pub error: Option<String>,
}

impl Default for ListingSnapshot {
    fn default() -> Self {
        Self {
            products: Vec::new(),
            // Assume more pages until the first response says otherwise
            has_next_page: true,
            total_count: 0,
            is_loading: false,
            error: None,
        }
    }
}

/// The product listing state container.
#[derive(Clone)]
pub struct ProductStore {
    inner: Arc<ProductInner>,
}

struct ProductInner {
    catalog: Arc<dyn CatalogApi>,
    state: watch::Sender<ListingSnapshot>,
    /// Bumped by every initial load; stale responses carry an older value.
    generation: AtomicU64,
}

impl ProductStore {
    /// Create a product store over the given catalog collaborator.
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogApi>) -> Self {
        let (state, _) = watch::channel(ListingSnapshot::default());
        Self {
            inner: Arc::new(ProductInner {
                catalog,
                state,
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> ListingSnapshot {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to state transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ListingSnapshot> {
        self.inner.state.subscribe()
    }

    /// Load one page of the listing.
    ///
    /// With `is_initial` the fetched page replaces the listing; otherwise
    /// it is appended. `has_next_page` and `total_count` come from the
    /// response. A stale response (one overtaken by a newer initial load)
    /// is discarded without touching state.
    ///
    /// # Errors
    ///
    /// Returns the collaborator error, which is also recorded in the
    /// snapshot; the existing listing is left untouched on failure.
    #[instrument(skip(self, filter))]
    pub async fn load_products(
        &self,
        filter: &ProductFilter,
        page_size: u32,
        page: u32,
        is_initial: bool,
    ) -> Result<()> {
        let generation = if is_initial {
            self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1
        } else {
            self.inner.generation.load(Ordering::SeqCst)
        };

        self.inner.state.send_modify(|s| s.is_loading = true);

        let result = self
            .inner
            .catalog
            .fetch_products(filter, page_size, page)
            .await;

        if self.inner.generation.load(Ordering::SeqCst) != generation {
            debug!(page, "discarding stale listing response");
            return Ok(());
        }

        match result {
            Ok(fetched) => {
                debug!(
                    page,
                    count = fetched.products.len(),
                    total = fetched.total_count,
                    "listing page applied"
                );
                self.inner.state.send_modify(|s| {
                    if is_initial {
                        s.products = fetched.products;
                    } else {
                        s.products.extend(fetched.products);
                    }
                    s.has_next_page = fetched.has_next_page;
                    s.total_count = fetched.total_count;
                    s.is_loading = false;
                    s.error = None;
                });
                Ok(())
            }
            Err(e) => {
                warn!(page, error = %e, "failed to load products");
                self.inner.state.send_modify(|s| {
                    s.is_loading = false;
                    s.error = Some(e.to_string());
                });
                Err(e.into())
            }
        }
    }

    /// Create a product through the catalog.
    ///
    /// No speculative insert: only the server-confirmed product (with its
    /// assigned identifier) is prepended, and `total_count` incremented.
    ///
    /// # Errors
    ///
    /// Returns the collaborator error; the listing is unchanged on failure.
    #[instrument(skip(self, new_product), fields(title = %new_product.title))]
    pub async fn add_product(&self, new_product: NewProduct) -> Result<Product> {
        self.inner.state.send_modify(|s| s.is_loading = true);

        match self.inner.catalog.add_product(new_product).await {
            Ok(created) => {
                debug!(product_id = %created.id, "product created");
                let confirmed = created.clone();
                self.inner.state.send_modify(|s| {
                    s.products.insert(0, confirmed);
                    s.total_count += 1;
                    s.is_loading = false;
                    s.error = None;
                });
                Ok(created)
            }
            Err(e) => {
                warn!(error = %e, "failed to create product");
                self.inner.state.send_modify(|s| {
                    s.is_loading = false;
                    s.error = Some(e.to_string());
                });
                Err(e.into())
            }
        }
    }
}
