//! Session store.
//!
//! Authentication identity and status. The status is an explicit
//! three-state machine rather than a bare flag:
//!
//! ```text
//! Anonymous -> PendingVerification -> Authenticated
//!     ^               |                    |
//!     +---------------+--------------------+   (logout, failed verify)
//! ```
//!
//! At process start, [`restore`](SessionStore::restore) optimistically
//! enters `PendingVerification` when an unexpired persisted credential
//! exists, then re-verifies against the identity collaborator. This avoids
//! a loading flash but opens a short window where
//! [`SessionSnapshot::is_authenticated`] is true while `user` is still
//! `None`; consumers (notably the cart store's init) tolerate it.
//!
//! Credential invalidation is a silent logout, never a user-facing error.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use peachstand_core::{Email, StoredCredential, User};

use crate::api::{IdentityApi, RegisterRequest};
use crate::error::Result;
use crate::storage::CredentialStore;

/// How long a freshly issued credential is trusted locally.
const CREDENTIAL_TTL_DAYS: i64 = 7;

/// Authentication status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStatus {
    /// No session.
    #[default]
    Anonymous,
    /// A persisted credential was found; re-verification is in flight.
    PendingVerification,
    /// Identity confirmed.
    Authenticated,
}

/// Observable session state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    /// Where in the state machine the session is.
    pub status: AuthStatus,
    /// The confirmed identity; `None` during `PendingVerification`.
    pub user: Option<User>,
}

impl SessionSnapshot {
    /// Whether the session counts as logged in.
    ///
    /// True during `PendingVerification` as well: the credential is being
    /// re-verified, but the UI should not flash a logged-out state.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        !matches!(self.status, AuthStatus::Anonymous)
    }
}

/// The session state container.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    identity: Arc<dyn IdentityApi>,
    credentials: Arc<dyn CredentialStore>,
    state: watch::Sender<SessionSnapshot>,
}

impl SessionStore {
    /// Create a session store over the identity collaborator and the
    /// persisted-credential store.
    #[must_use]
    pub fn new(identity: Arc<dyn IdentityApi>, credentials: Arc<dyn CredentialStore>) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::default());
        Self {
            inner: Arc::new(SessionInner {
                identity,
                credentials,
                state,
            }),
        }
    }

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to state transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.state.subscribe()
    }

    /// Set the user and flip to `Authenticated`.
    pub fn set_user(&self, user: User) {
        self.inner.state.send_replace(SessionSnapshot {
            status: AuthStatus::Authenticated,
            user: Some(user),
        });
    }

    /// Flip the login flag independently of the user.
    ///
    /// Used while deferring user population: a credential was found but
    /// the identity has not been re-verified yet.
    pub fn set_logged_in(&self, logged_in: bool) {
        self.inner.state.send_modify(|s| {
            s.status = if logged_in {
                if s.user.is_some() {
                    AuthStatus::Authenticated
                } else {
                    AuthStatus::PendingVerification
                }
            } else {
                AuthStatus::Anonymous
            };
        });
    }

    /// Clear the persisted credential and return to `Anonymous`.
    #[instrument(skip(self))]
    pub fn logout(&self) {
        if let Err(e) = self.inner.credentials.clear() {
            warn!(error = %e, "failed to remove persisted credential");
        }
        self.inner.state.send_replace(SessionSnapshot::default());
    }

    /// Sign in with email and password.
    ///
    /// On success, persists a fresh credential and flips to
    /// `Authenticated` with the user populated.
    ///
    /// # Errors
    ///
    /// Returns the collaborator error; session state is unchanged on
    /// failure.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &Email, password: &str) -> Result<User> {
        let signed_in = self.inner.identity.sign_in(email, password).await?;

        let credential = StoredCredential::new(signed_in.token, CREDENTIAL_TTL_DAYS);
        if let Err(e) = self.inner.credentials.save(&credential) {
            // The in-memory session still works; only restore-on-restart is lost
            warn!(error = %e, "failed to persist credential");
        }

        self.set_user(signed_in.user.clone());
        Ok(signed_in.user)
    }

    /// Register a new account.
    ///
    /// Does not mutate session state; the caller routes to the login flow
    /// with the returned identity.
    ///
    /// # Errors
    ///
    /// Returns the collaborator error.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> Result<User> {
        let user = self.inner.identity.register_user(request).await?;
        Ok(user)
    }

    /// Restore the session from the persisted credential, if any.
    ///
    /// Optimistic-then-verify: an unexpired credential immediately moves
    /// the session to `PendingVerification`, then the identity
    /// collaborator is asked to re-verify. Verification failure (or a
    /// missing identity) reverts to `Anonymous` and discards the
    /// credential - silently, since credential invalidation is not a
    /// user-facing error.
    ///
    /// Returns the final status.
    #[instrument(skip(self))]
    pub async fn restore(&self) -> AuthStatus {
        let credential = match self.inner.credentials.load() {
            Ok(Some(credential)) => credential,
            Ok(None) => {
                debug!("no persisted credential");
                return AuthStatus::Anonymous;
            }
            Err(e) => {
                warn!(error = %e, "unreadable persisted credential, discarding");
                self.discard_credential();
                return AuthStatus::Anonymous;
            }
        };

        if credential.is_expired() {
            debug!("persisted credential expired");
            self.discard_credential();
            return AuthStatus::Anonymous;
        }

        // Optimistic: mark the session pending before the collaborator call
        self.inner.state.send_replace(SessionSnapshot {
            status: AuthStatus::PendingVerification,
            user: None,
        });

        let verified = match self.inner.identity.get_id_token(true).await {
            Ok(_token) => self.inner.identity.current_user().await.unwrap_or(None),
            Err(e) => {
                debug!(error = %e, "credential re-verification failed");
                None
            }
        };

        match verified {
            Some(user) => {
                self.set_user(user);
                AuthStatus::Authenticated
            }
            None => {
                self.discard_credential();
                self.inner.state.send_replace(SessionSnapshot::default());
                AuthStatus::Anonymous
            }
        }
    }

    fn discard_credential(&self) {
        if let Err(e) = self.inner.credentials.clear() {
            warn!(error = %e, "failed to remove persisted credential");
        }
    }
}
