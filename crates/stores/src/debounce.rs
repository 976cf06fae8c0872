//! Debounced setter adapter.
//!
//! Free-text and numeric filter inputs must not trigger a listing reload
//! per keystroke. [`Debounced`] wraps a pure setter behind a quiescence
//! window: every call restarts the timer, and only the value present when
//! the window elapses uninterrupted is committed. The timer belongs to
//! the UI boundary, not the store - dropping the adapter cancels any
//! pending commit, so a setter is never invoked after its consumer is
//! gone.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

/// A setter wrapped behind a per-field debounce timer.
pub struct Debounced<T> {
    window: Duration,
    apply: Arc<dyn Fn(T) + Send + Sync>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> Debounced<T> {
    /// Wrap `apply` behind a quiescence window.
    pub fn new(window: Duration, apply: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            window,
            apply: Arc::new(apply),
            pending: Mutex::new(None),
        }
    }

    /// Record a new value, restarting the window.
    ///
    /// The previous pending value (if any) is dropped uncommitted. Must
    /// be called from within a tokio runtime.
    pub fn call(&self, value: T) {
        let mut pending = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = pending.take() {
            handle.abort();
        }

        let apply = Arc::clone(&self.apply);
        let window = self.window;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            apply(value);
        }));
    }

    /// Drop any pending value without committing it.
    pub fn cancel(&self) {
        if let Some(handle) = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
    }
}

impl<T> Drop for Debounced<T> {
    fn drop(&mut self) {
        if let Some(handle) = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
    }
}
