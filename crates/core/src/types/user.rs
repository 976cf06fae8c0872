//! Authenticated user identity.

use serde::{Deserialize, Serialize};

use super::id::UserId;

/// Identity of the authenticated user, as reported by the identity
/// collaborator.
///
/// The email is kept as plain text here: the provider may report it empty
/// for federated accounts, so it is not forced through [`crate::Email`]
/// validation on this read path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Provider-assigned user identifier.
    pub id: UserId,
    /// Email address, possibly empty.
    pub email: String,
    /// Display name, possibly empty.
    pub display_name: String,
}
