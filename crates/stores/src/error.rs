//! Unified error type for store operations.
//!
//! Stores capture collaborator failures into their snapshot `error` fields
//! and also return them, so callers can route distinguished cases (such as
//! catalog index errors) to a dedicated flow. Nothing here ever panics the
//! process.

use thiserror::Error;

use crate::api::ApiError;
use crate::storage::StorageError;

/// Store-level error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A remote collaborator call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The durable local storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl StoreError {
    /// The remediation link, if this wraps a catalog index error.
    #[must_use]
    pub const fn remediation_link(&self) -> Option<&String> {
        match self {
            Self::Api(ApiError::IndexRequired { link }) => Some(link),
            _ => None,
        }
    }
}

/// Result type alias for `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;
