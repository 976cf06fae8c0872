//! Peachstand Stores - Client-side reactive state layer.
//!
//! Independent state containers for the storefront client: cart, product
//! listing, filter, session, toast, and purchase. Each store owns a
//! snapshot behind a [`tokio::sync::watch`] channel: `snapshot()` reads
//! the current value, `subscribe()` yields a receiver that observes every
//! state transition. Mutations are discrete, non-preemptible sections;
//! suspension happens only at awaited collaborator calls.
//!
//! Remote collaborators (catalog, identity, purchase) are injected as
//! trait objects from [`api`]; durable per-user cart storage and the
//! persisted credential come from [`storage`]. Stores never panic on a
//! collaborator failure - every async operation resolves into a normal
//! state update, including the failure case.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod config;
pub mod debounce;
pub mod error;
pub mod filter;
pub mod product;
pub mod purchase;
pub mod session;
pub mod storage;
pub mod toast;

pub use api::{ApiError, CatalogApi, IdentityApi, Order, ProductPage, PurchaseApi, Receipt};
pub use cart::{CartSnapshot, CartStore};
pub use config::StoreConfig;
pub use debounce::Debounced;
pub use error::{Result, StoreError};
pub use filter::FilterStore;
pub use product::{ListingSnapshot, ProductStore};
pub use purchase::{PurchaseSnapshot, PurchaseStore};
pub use session::{AuthStatus, SessionSnapshot, SessionStore};
pub use storage::{CartStorage, CredentialStore, StorageError};
pub use toast::{ToastKind, ToastSnapshot, ToastStore};
