//! Cart line item type.

use serde::{Deserialize, Serialize};

use super::price::Price;
use super::product::Product;

/// A cart line: a product plus the quantity in the cart.
///
/// The cart store guarantees at most one line per product identifier per
/// user; repeated adds increment `count` instead of inserting a duplicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// The product this line refers to.
    #[serde(flatten)]
    pub product: Product,
    /// Quantity in the cart, always at least 1.
    pub count: u32,
}

impl CartItem {
    /// Create a line for `product` with the given quantity.
    #[must_use]
    pub const fn new(product: Product, count: u32) -> Self {
        Self { product, count }
    }

    /// Line total: unit price times quantity, saturating on overflow.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product
            .price
            .checked_mul(self.count)
            .unwrap_or(Price::new(u64::MAX))
    }
}
