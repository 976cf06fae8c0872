//! Catalog product types.

use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};
use super::price::Price;

/// A product as returned by the catalog collaborator.
///
/// Immutable once fetched; the listing only changes through explicit
/// re-fetches or a confirmed create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Server-assigned product identifier.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price in the smallest currency unit.
    pub price: Price,
    /// Category the product belongs to.
    pub category: CategoryId,
    /// Reference to the product image (URL or storage key).
    pub image: String,
    /// Long-form description.
    pub description: String,
}

/// A product create request; the server assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub title: String,
    pub price: Price,
    pub category: CategoryId,
    pub image: String,
    pub description: String,
}
