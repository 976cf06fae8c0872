//! Persisted credential types.
//!
//! The session store corroborates its in-memory state with a single
//! persisted access token. The token value is wrapped in [`SecretString`]
//! so it is redacted from `Debug` output and log lines.

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

/// A persisted access token with an expiry.
///
/// Only the session store reads or removes this; every other component
/// observes authentication through the session snapshot.
#[derive(Clone, Serialize, Deserialize)]
pub struct StoredCredential {
    /// The opaque access token issued by the identity collaborator.
    /// Persisted verbatim; `secrecy` does not serialize secrets by default.
    #[serde(serialize_with = "serialize_token")]
    token: SecretString,
    /// Instant after which the token is no longer trusted locally.
    expires_at: DateTime<Utc>,
}

impl StoredCredential {
    /// Create a credential expiring `ttl_days` from now.
    #[must_use]
    pub fn new(token: impl Into<String>, ttl_days: i64) -> Self {
        Self {
            token: SecretString::from(token.into()),
            expires_at: Utc::now() + Duration::days(ttl_days),
        }
    }

    /// Create a credential with an explicit expiry instant.
    #[must_use]
    pub fn with_expiry(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: SecretString::from(token.into()),
            expires_at,
        }
    }

    /// Whether the credential has passed its expiry.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// The expiry instant.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Expose the raw token for a collaborator call.
    #[must_use]
    pub fn expose_token(&self) -> &str {
        self.token.expose_secret()
    }
}

fn serialize_token<S: Serializer>(token: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(token.expose_secret())
}

impl std::fmt::Debug for StoredCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredCredential")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
