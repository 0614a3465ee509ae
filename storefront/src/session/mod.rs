//! Client-side session: token store, profile cache, change notification.
//!
//! ARCHITECTURE
//! ============
//! The session is two records in a [`Storage`] backend:
//!
//! - `isdstore.auth` holds a serialized [`TokenPair`]
//! - `isdstore.profile` holds a serialized [`Profile`]
//!
//! Both are whole-record replacements. A record that is missing or fails to
//! parse reads as absent; a corrupt record is an expected state (old client,
//! hand-edited file), not an error. Every save or clear fires
//! [`AuthEvents::notify`] after the write lands.
//!
//! Lifecycle: `LoggedOut -> save -> LoggedIn -> clear -> LoggedOut`. There is
//! no refreshing state; an expired access token surfaces as a request error
//! and the caller clears the session.

pub mod claims;
pub mod events;
mod profile;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::storage::{Storage, StorageError};
use claims::DecodedClaims;
pub use events::{AuthEvents, AuthSubscription};
pub use profile::Profile;

/// Storage key of the serialized [`TokenPair`].
pub const AUTH_KEY: &str = "isdstore.auth";
/// Storage key of the serialized [`Profile`].
pub const PROFILE_KEY: &str = "isdstore.profile";

/// Access/refresh token pair issued by `POST /api/auth/login`.
///
/// Both tokens are opaque to the client. The refresh token is stored but
/// never exchanged; there is no refresh flow.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Shared handle to the persisted session.
///
/// Cloning is cheap; clones share the backend and the change channel.
pub struct Session<S> {
    inner: Arc<Inner<S>>,
}

struct Inner<S> {
    storage: S,
    events: AuthEvents,
}

impl<S> Clone for Session<S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<S: Storage> Session<S> {
    pub fn new(storage: S) -> Self {
        Self { inner: Arc::new(Inner { storage, events: AuthEvents::new() }) }
    }

    /// The underlying backend.
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.inner.storage
    }

    /// Subscribe to save/clear notifications.
    #[must_use]
    pub fn subscribe(&self) -> AuthSubscription {
        self.inner.events.subscribe()
    }

    /// Persist `tokens`, replacing any stored pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write. No change event is
    /// fired in that case.
    pub fn save(&self, tokens: &TokenPair) -> Result<(), StorageError> {
        self.write_record(AUTH_KEY, tokens)?;
        tracing::info!("session tokens saved");
        self.inner.events.notify();
        Ok(())
    }

    /// The stored token pair, or `None` when missing or unreadable.
    #[must_use]
    pub fn load(&self) -> Option<TokenPair> {
        self.read_record(AUTH_KEY)
    }

    /// Remove the token pair and the cached profile.
    ///
    /// Both removals are attempted and a change event fires even if one of
    /// them failed.
    ///
    /// # Errors
    ///
    /// Returns the first backend error encountered.
    pub fn clear(&self) -> Result<(), StorageError> {
        let tokens = self.inner.storage.remove_item(AUTH_KEY);
        let profile = self.inner.storage.remove_item(PROFILE_KEY);
        tracing::info!("session cleared");
        self.inner.events.notify();
        tokens.and(profile)
    }

    /// The stored access token.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.load().map(|t| t.access_token)
    }

    /// Whether an access token is stored. Says nothing about its validity.
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.load().is_some()
    }

    /// Unverified claims of the stored access token. Display hints only;
    /// see [`claims`].
    #[must_use]
    pub fn claims(&self) -> Option<DecodedClaims> {
        claims::decode(self.access_token().as_deref())
    }

    /// The `role` claim of the stored access token, unverified.
    #[must_use]
    pub fn role_of(&self) -> Option<String> {
        self.claims().and_then(|c| c.role().map(str::to_owned))
    }

    fn write_record<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.inner.storage.set_item(key, &raw)
    }

    fn read_record<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.inner.storage.get_item(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(key, error = %e, "ignoring unreadable session record");
                None
            }
        }
    }
}
