use serde::{Deserialize, Serialize};

use super::{PROFILE_KEY, Session};
use crate::storage::{Storage, StorageError};

/// Local echo of the signed-in user's email, kept for greeting text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub email: String,
}

impl<S: Storage> Session<S> {
    /// Persist the profile record. Cleared together with the tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    pub fn save_profile(&self, profile: &Profile) -> Result<(), StorageError> {
        self.write_record(PROFILE_KEY, profile)?;
        self.inner.events.notify();
        Ok(())
    }

    #[must_use]
    pub fn profile(&self) -> Option<Profile> {
        self.read_record(PROFILE_KEY)
    }

    #[must_use]
    pub fn user_email(&self) -> Option<String> {
        self.profile().map(|p| p.email)
    }
}
