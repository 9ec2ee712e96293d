use std::sync::Arc;

use crate::backend::{KeyValueStore, MemoryStore};
use crate::error::StorageError;
use crate::model::{Profile, ProfilePatch, Session};
use crate::secret::SecretString;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const USER_KEY: &str = "user";

const ALL_KEYS: [&str; 3] = [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY];

/// Owner of the persisted session.
///
/// Cheap to clone; clones share the backend. Nothing else reads or writes the
/// three session keys.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("logged_in", &self.is_logged_in())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    #[must_use]
    pub fn from_arc(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Store backed by a fresh [`MemoryStore`]
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Persist a freshly issued session.
    ///
    /// # Errors
    /// Returns `StorageError` if the profile cannot be encoded or the backend
    /// rejects the write. Login must fail in that case.
    pub fn save(
        &self,
        access_token: &SecretString,
        refresh_token: &SecretString,
        profile: &Profile,
    ) -> Result<(), StorageError> {
        let user = serde_json::to_string(profile)?;
        self.backend.set_many(&[
            (ACCESS_TOKEN_KEY, access_token.expose()),
            (REFRESH_TOKEN_KEY, refresh_token.expose()),
            (USER_KEY, &user),
        ])?;
        tracing::debug!(user_id = %profile.id, role = %profile.role, "session saved");
        Ok(())
    }

    /// `None` when absent or when the backend cannot be read.
    #[must_use]
    pub fn access_token(&self) -> Option<SecretString> {
        self.read(ACCESS_TOKEN_KEY).map(SecretString::from)
    }

    /// `None` when absent or when the backend cannot be read.
    #[must_use]
    pub fn refresh_token(&self) -> Option<SecretString> {
        self.read(REFRESH_TOKEN_KEY).map(SecretString::from)
    }

    /// Stored profile; `None` when absent, unreadable or malformed.
    #[must_use]
    pub fn profile(&self) -> Option<Profile> {
        let raw = self.read(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!(error = %e, "stored user profile is malformed; ignoring it");
                None
            }
        }
    }

    /// Merge `patch` into the stored profile. No-op without a stored profile.
    ///
    /// # Errors
    /// Returns `StorageError` if the merged profile cannot be written.
    pub fn update_profile(&self, patch: &ProfilePatch) -> Result<(), StorageError> {
        let Some(mut profile) = self.profile() else {
            tracing::debug!("no stored profile; profile update skipped");
            return Ok(());
        };
        patch.apply_to(&mut profile);
        self.replace_profile(&profile)
    }

    /// Overwrite the stored profile with the server's copy.
    ///
    /// # Errors
    /// Returns `StorageError` if the profile cannot be written.
    pub fn replace_profile(&self, profile: &Profile) -> Result<(), StorageError> {
        let user = serde_json::to_string(profile)?;
        self.backend.set(USER_KEY, &user)
    }

    /// Replace only the access token. Refresh token and profile stay.
    ///
    /// # Errors
    /// Returns `StorageError` if the backend rejects the write.
    pub fn update_access_token(&self, token: &SecretString) -> Result<(), StorageError> {
        self.backend.set(ACCESS_TOKEN_KEY, token.expose())?;
        tracing::debug!("access token replaced");
        Ok(())
    }

    /// Remove all three keys. Never fails; backend errors are logged.
    pub fn clear(&self) {
        if let Err(e) = self.backend.remove_many(&ALL_KEYS) {
            tracing::warn!(error = %e, "failed to clear session storage");
        } else {
            tracing::debug!("session cleared");
        }
    }

    /// Both an access token and a readable profile are stored.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.access_token().is_some() && self.profile().is_some()
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        Session {
            access_token: self.access_token(),
            refresh_token: self.refresh_token(),
            user: self.profile(),
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.backend.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "session backend read failed");
                None
            }
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
