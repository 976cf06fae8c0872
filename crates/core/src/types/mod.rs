//! Core types for Peachstand.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod credential;
pub mod email;
pub mod filter;
pub mod id;
pub mod price;
pub mod product;
pub mod user;

pub use cart::CartItem;
pub use credential::StoredCredential;
pub use email::{Email, EmailError};
pub use filter::ProductFilter;
pub use id::*;
pub use price::Price;
pub use product::{NewProduct, Product};
pub use user::User;
