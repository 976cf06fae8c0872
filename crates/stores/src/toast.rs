//! Notification (toast) store.
//!
//! A small finite-state machine: hidden until [`show`](ToastStore::show),
//! hidden again after a fixed timeout or an explicit
//! [`hide`](ToastStore::hide). Only one notification is live at a time -
//! a newer `show` replaces message and kind and restarts the timeout.
//! No queueing.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tracing::instrument;

use crate::config::DEFAULT_TOAST_TIMEOUT;

/// Kind of notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastKind {
    #[default]
    Success,
    Error,
}

/// Observable toast state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToastSnapshot {
    /// Message text.
    pub message: String,
    /// Success or error styling.
    pub kind: ToastKind,
    /// Whether the toast is currently shown.
    pub is_visible: bool,
}

/// The toast state container.
#[derive(Clone)]
pub struct ToastStore {
    inner: Arc<ToastInner>,
}

struct ToastInner {
    state: watch::Sender<ToastSnapshot>,
    timeout: Duration,
    /// Bumped by every show/hide; a dismiss timer only fires if its stamp
    /// is still current, so a stale timer never hides a newer toast.
    sequence: AtomicU64,
}

impl Default for ToastStore {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_TIMEOUT)
    }
}

impl ToastStore {
    /// Create a toast store with the given auto-dismiss timeout.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let (state, _) = watch::channel(ToastSnapshot::default());
        Self {
            inner: Arc::new(ToastInner {
                state,
                timeout,
                sequence: AtomicU64::new(0),
            }),
        }
    }

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> ToastSnapshot {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to state transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ToastSnapshot> {
        self.inner.state.subscribe()
    }

    /// Show a notification, replacing any visible one and restarting the
    /// auto-dismiss timeout (last-write-wins).
    ///
    /// Must be called from within a tokio runtime; the dismiss timer is a
    /// spawned task.
    #[instrument(skip(self, message))]
    pub fn show(&self, message: impl Into<String>, kind: ToastKind) {
        let stamp = self.inner.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let message = message.into();

        self.inner.state.send_replace(ToastSnapshot {
            message,
            kind,
            is_visible: true,
        });

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(inner.timeout).await;
            if inner.sequence.load(Ordering::SeqCst) == stamp {
                inner.state.send_modify(|s| s.is_visible = false);
            }
        });
    }

    /// Hide the notification immediately.
    pub fn hide(&self) {
        // Invalidate any pending dismiss timer
        self.inner.sequence.fetch_add(1, Ordering::SeqCst);
        self.inner.state.send_modify(|s| s.is_visible = false);
    }
}
