//! Session change notification.
//!
//! Every save or clear of the token or profile record bumps a generation
//! counter on a watch channel. Independent UI regions hold an
//! [`AuthSubscription`] and re-read the session when it moves; there is no
//! payload and no shared in-memory session tree.

use std::sync::Arc;

use tokio::sync::watch;

/// Tracing target for change notifications.
pub const AUTH_CHANGED: &str = "auth:changed";

#[derive(Debug, Clone)]
pub struct AuthEvents {
    tx: Arc<watch::Sender<u64>>,
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthEvents {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    /// Signal that session storage changed.
    pub fn notify(&self) {
        self.tx.send_modify(|generation| *generation = generation.wrapping_add(1));
        tracing::debug!(target: AUTH_CHANGED, generation = *self.tx.borrow(), "session storage changed");
    }

    /// Subscribe to future changes. Changes made before this call are
    /// already counted as seen.
    #[must_use]
    pub fn subscribe(&self) -> AuthSubscription {
        AuthSubscription { rx: self.tx.subscribe() }
    }

    /// Number of changes signalled so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        *self.tx.borrow()
    }
}

/// Receiving end of [`AuthEvents`].
#[derive(Debug, Clone)]
pub struct AuthSubscription {
    rx: watch::Receiver<u64>,
}

impl AuthSubscription {
    /// Wait for the next change.
    ///
    /// Returns `false` once the session that owns the sender is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Whether a change arrived since the last [`Self::mark_seen`] or
    /// [`Self::changed`].
    #[must_use]
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Acknowledge pending changes, returning the current generation.
    pub fn mark_seen(&mut self) -> u64 {
        *self.rx.borrow_and_update()
    }
}

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;
