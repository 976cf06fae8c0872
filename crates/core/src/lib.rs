//! Peachstand Core - Shared types library.
//!
//! This crate provides common types used across all Peachstand components:
//! - `stores` - Client-side reactive state layer
//! - `integration-tests` - Cross-store scenario tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no timers, no collaborator
//! calls. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and
//!   credentials, plus the storefront domain values (products, cart items,
//!   filters, users)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
