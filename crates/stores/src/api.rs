//! Collaborator contracts consumed by the stores.
//!
//! The remote catalog, identity provider, and purchase service are
//! injected as trait objects so every store is independently constructible
//! and testable against scripted implementations. The traits carry the
//! request/response shapes from the backend, nothing more - no transport
//! details leak into the stores.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use thiserror::Error;
use url::Url;

use peachstand_core::{CartItem, Email, NewProduct, OrderId, Product, ProductFilter, User, UserId};

/// Message fragment the catalog backend emits when a query needs a
/// composite index created first.
static INDEX_ERROR: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // pattern is a literal, checked by tests
    Regex::new(r"(?i)requires an index").unwrap()
});

/// First https link in an error message, used as the remediation target.
static REMEDIATION_LINK: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // pattern is a literal, checked by tests
    Regex::new(r"https://\S+").unwrap()
});

/// Errors returned by remote collaborators.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never completed (connectivity, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// The email/password pair was rejected.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A previously issued credential is no longer accepted.
    #[error("credential expired or revoked")]
    CredentialInvalid,

    /// The catalog query needs an index created first; `link` points at
    /// the remediation console.
    #[error("catalog query requires an index: {link}")]
    IndexRequired { link: String },

    /// Any other backend-reported failure.
    #[error("{0}")]
    Backend(String),
}

impl ApiError {
    /// Classify a raw backend error message.
    ///
    /// Index/precondition errors are recognized by message pattern and get
    /// their remediation link extracted, so consumers can route them to a
    /// dedicated flow instead of the generic error field.
    #[must_use]
    pub fn classify(message: &str) -> Self {
        if INDEX_ERROR.is_match(message) {
            if let Some(link) = extract_remediation_link(message) {
                return Self::IndexRequired { link };
            }
        }
        Self::Backend(message.to_owned())
    }
}

/// Extract the first well-formed https link from an error message.
#[must_use]
pub fn extract_remediation_link(message: &str) -> Option<String> {
    let raw = REMEDIATION_LINK.find(message)?.as_str();
    // Strip trailing punctuation the backend wraps around the link
    let trimmed = raw.trim_end_matches(['.', ',', ')', ']', '"']);
    Url::parse(trimmed).ok().map(Into::into)
}

/// One page of the product listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPage {
    /// Products in server order.
    pub products: Vec<Product>,
    /// Whether another page exists after this one.
    pub has_next_page: bool,
    /// Total products matching the filter, across all pages.
    pub total_count: u64,
}

/// Registration request sent to the identity provider.
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub email: Email,
    pub password: String,
    pub name: String,
}

/// Successful sign-in: the identity plus the issued access token.
#[derive(Debug, Clone)]
pub struct SignIn {
    pub user: User,
    pub token: String,
}

/// Shipping and payment details collected at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub requests: String,
    pub payment: String,
}

/// Confirmation returned by the purchase service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Server-assigned order identifier.
    pub order_id: OrderId,
}

/// Remote product catalog.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetch one page of the filtered listing. Pages are numbered from 1.
    async fn fetch_products(
        &self,
        filter: &ProductFilter,
        page_size: u32,
        page: u32,
    ) -> Result<ProductPage, ApiError>;

    /// Create a product; the server assigns the identifier.
    async fn add_product(&self, new_product: NewProduct) -> Result<Product, ApiError>;
}

/// Remote identity provider.
#[async_trait]
pub trait IdentityApi: Send + Sync {
    /// Exchange email/password for an identity and access token.
    async fn sign_in(&self, email: &Email, password: &str) -> Result<SignIn, ApiError>;

    /// Re-verify the current credential, optionally forcing a refresh.
    async fn get_id_token(&self, force_refresh: bool) -> Result<String, ApiError>;

    /// Identity behind the current credential, if the provider has one.
    async fn current_user(&self) -> Result<Option<User>, ApiError>;

    /// Register a new account.
    async fn register_user(&self, request: RegisterRequest) -> Result<User, ApiError>;
}

/// Remote purchase/order service.
#[async_trait]
pub trait PurchaseApi: Send + Sync {
    /// Place an order for the given cart.
    async fn make_purchase(
        &self,
        order: &Order,
        user_id: &UserId,
        cart: &[CartItem],
    ) -> Result<Receipt, ApiError>;
}
