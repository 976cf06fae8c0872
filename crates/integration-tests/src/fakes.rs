//! In-memory collaborator fakes with real behavior.
//!
//! Unlike the scripted stubs in the store unit tests, these fakes
//! actually filter, paginate, and keep account books, so scenario tests
//! can drive whole flows without choreographing individual replies.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use peachstand_core::{
    CartItem, CategoryId, Email, NewProduct, OrderId, Price, Product, ProductFilter, ProductId,
    User, UserId,
};
use peachstand_stores::api::{
    ApiError, CatalogApi, IdentityApi, Order, ProductPage, PurchaseApi, Receipt, RegisterRequest,
    SignIn,
};

/// Build a catalog product for seeding fakes.
#[must_use]
pub fn product(id: &str, title: &str, price: u64, category: &str) -> Product {
    Product {
        id: ProductId::new(id),
        title: title.to_owned(),
        price: Price::new(price),
        category: CategoryId::new(category),
        image: format!("https://img.example.com/{id}.jpg"),
        description: String::new(),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Catalog
// =============================================================================

/// Catalog fake over an in-memory product list.
///
/// Applies the filter and paginates for real; newly created products go
/// to the front, matching a newest-first backend ordering.
#[derive(Default)]
pub struct FakeCatalog {
    products: Mutex<Vec<Product>>,
}

impl FakeCatalog {
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: Mutex::new(products),
        }
    }
}

fn matches_filter(product: &Product, filter: &ProductFilter) -> bool {
    if let Some(min) = filter.min_price {
        if product.price < min {
            return false;
        }
    }
    if let Some(max) = filter.max_price {
        if product.price > max {
            return false;
        }
    }
    if !filter.title.is_empty()
        && !product
            .title
            .to_lowercase()
            .contains(&filter.title.to_lowercase())
    {
        return false;
    }
    if let Some(category) = &filter.category {
        if &product.category != category {
            return false;
        }
    }
    true
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn fetch_products(
        &self,
        filter: &ProductFilter,
        page_size: u32,
        page: u32,
    ) -> Result<ProductPage, ApiError> {
        let filtered: Vec<Product> = lock(&self.products)
            .iter()
            .filter(|p| matches_filter(p, filter))
            .cloned()
            .collect();

        let total_count = u64::try_from(filtered.len()).unwrap_or(u64::MAX);
        let page_size = usize::try_from(page_size).unwrap_or(usize::MAX);
        let start = usize::try_from(page.saturating_sub(1))
            .unwrap_or(usize::MAX)
            .saturating_mul(page_size);
        let products: Vec<Product> = filtered.iter().skip(start).take(page_size).cloned().collect();
        let has_next_page = start.saturating_add(products.len()) < filtered.len();

        Ok(ProductPage {
            products,
            has_next_page,
            total_count,
        })
    }

    async fn add_product(&self, new_product: NewProduct) -> Result<Product, ApiError> {
        let created = Product {
            id: ProductId::new(Uuid::new_v4().to_string()),
            title: new_product.title,
            price: new_product.price,
            category: new_product.category,
            image: new_product.image,
            description: new_product.description,
        };
        lock(&self.products).insert(0, created.clone());
        Ok(created)
    }
}

// =============================================================================
// Identity
// =============================================================================

struct Account {
    password: String,
    user: User,
}

/// Identity fake with an account book and a provider-side session.
///
/// User identifiers are deterministic (the email itself), so tests can
/// pre-seed per-user storage before logging in.
#[derive(Default)]
pub struct FakeIdentity {
    accounts: Mutex<HashMap<String, Account>>,
    session: Mutex<Option<User>>,
}

impl FakeIdentity {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An identity provider with one pre-registered account.
    #[must_use]
    pub fn with_account(email: &str, password: &str, name: &str) -> Self {
        let identity = Self::default();
        identity.add_account(email, password, name);
        identity
    }

    /// Register an account directly, bypassing the API.
    pub fn add_account(&self, email: &str, password: &str, name: &str) -> User {
        let user = User {
            id: UserId::new(email),
            email: email.to_owned(),
            display_name: name.to_owned(),
        };
        lock(&self.accounts).insert(
            email.to_owned(),
            Account {
                password: password.to_owned(),
                user: user.clone(),
            },
        );
        user
    }

    /// Drop the provider-side session, as a server-side revocation would.
    pub fn revoke_sessions(&self) {
        *lock(&self.session) = None;
    }
}

#[async_trait]
impl IdentityApi for FakeIdentity {
    async fn sign_in(&self, email: &Email, password: &str) -> Result<SignIn, ApiError> {
        let user = {
            let accounts = lock(&self.accounts);
            let account = accounts
                .get(email.as_str())
                .filter(|a| a.password == password)
                .ok_or(ApiError::InvalidCredentials)?;
            account.user.clone()
        };
        *lock(&self.session) = Some(user.clone());
        Ok(SignIn {
            user,
            token: Uuid::new_v4().to_string(),
        })
    }

    async fn get_id_token(&self, _force_refresh: bool) -> Result<String, ApiError> {
        if lock(&self.session).is_some() {
            Ok(Uuid::new_v4().to_string())
        } else {
            Err(ApiError::CredentialInvalid)
        }
    }

    async fn current_user(&self) -> Result<Option<User>, ApiError> {
        Ok(lock(&self.session).clone())
    }

    async fn register_user(&self, request: RegisterRequest) -> Result<User, ApiError> {
        let mut accounts = lock(&self.accounts);
        if accounts.contains_key(request.email.as_str()) {
            return Err(ApiError::Backend("email already registered".to_owned()));
        }
        let user = User {
            id: UserId::new(request.email.as_str()),
            email: request.email.as_str().to_owned(),
            display_name: request.name,
        };
        accounts.insert(
            user.email.clone(),
            Account {
                password: request.password,
                user: user.clone(),
            },
        );
        Ok(user)
    }
}

// =============================================================================
// Purchase
// =============================================================================

/// What the purchase fake was asked to fulfil.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order: Order,
    pub user_id: UserId,
    pub cart: Vec<CartItem>,
}

/// Purchase fake recording every accepted order.
#[derive(Default)]
pub struct FakePurchase {
    orders: Mutex<Vec<PlacedOrder>>,
    fail_with: Mutex<Option<ApiError>>,
}

impl FakePurchase {
    /// Make the next purchase fail with `error`.
    pub fn fail_next(&self, error: ApiError) {
        *lock(&self.fail_with) = Some(error);
    }

    /// Orders accepted so far.
    #[must_use]
    pub fn placed(&self) -> Vec<PlacedOrder> {
        lock(&self.orders).clone()
    }
}

#[async_trait]
impl PurchaseApi for FakePurchase {
    async fn make_purchase(
        &self,
        order: &Order,
        user_id: &UserId,
        cart: &[CartItem],
    ) -> Result<Receipt, ApiError> {
        if let Some(error) = lock(&self.fail_with).take() {
            return Err(error);
        }
        lock(&self.orders).push(PlacedOrder {
            order: order.clone(),
            user_id: user_id.clone(),
            cart: cart.to_vec(),
        });
        Ok(Receipt {
            order_id: OrderId::new(Uuid::new_v4().to_string()),
        })
    }
}
