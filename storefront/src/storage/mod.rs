//! Key-value persistence for client-side session state.
//!
//! DESIGN
//! ======
//! The session layer needs nothing more than a string register per key, the
//! same contract browser `localStorage` offers. Every write replaces the whole
//! value under a key; there is no versioning and no compare-and-swap, so the
//! last writer wins.

mod file;
mod memory;
#[cfg(feature = "web")]
mod web;

pub use file::FileStorage;
pub use memory::MemoryStorage;
#[cfg(feature = "web")]
pub use web::LocalStorage;

use std::path::PathBuf;

/// Error returned when a backend cannot persist a write.
///
/// Reads never fail: a missing or unreadable value is reported as absent.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backing file could not be read, written, or renamed into place.
    #[error("storage file {path} failed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The in-memory map could not be serialized for writing.
    #[error("storage encode failed: {0}")]
    Encode(#[from] serde_json::Error),

    /// No browser storage is reachable (no window, or storage disabled).
    #[error("browser storage unavailable")]
    Unavailable,

    /// The browser refused the write (quota exceeded, private mode).
    #[error("browser storage rejected write: {0}")]
    Rejected(String),
}

/// String-keyed register store.
///
/// Implementations take `&self` so a single backend can be shared by the
/// session and every request issued through it.
pub trait Storage {
    /// Return the value stored under `key`, or `None`.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend could not persist the write.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend could not persist the removal.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
