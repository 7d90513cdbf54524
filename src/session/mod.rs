//! Session Store: the bearer token and admin flag for one browsing context.
//!
//! A session lives in a [`SessionStorage`], a string key-value store with the
//! lifetime of a single "tab". [`MemoryStorage`] is exactly that; the CLI
//! uses [`FileStorage`] so that successive invocations under the same
//! session name share one tab.
//!
//! Nothing here tracks expiry. A present-but-expired token is only
//! discovered when the server rejects the next request.

mod storage;

pub use storage::{FileStorage, MemoryStorage, SessionStorage};

use crate::error::Result;

pub const TOKEN_KEY: &str = "auth-token";
pub const ADMIN_KEY: &str = "is-admin";

pub struct SessionStore {
    storage: Box<dyn SessionStorage>,
}

impl SessionStore {
    pub fn new(storage: impl SessionStorage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
        }
    }

    /// A fresh, empty in-memory session
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::default())
    }

    pub fn set_session(&self, token: &str, is_admin: bool) -> Result<()> {
        self.storage.set(TOKEN_KEY, token)?;
        self.storage.set(ADMIN_KEY, if is_admin { "true" } else { "false" })?;
        tracing::debug!(is_admin, "session established");
        Ok(())
    }

    pub fn token(&self) -> Option<String> {
        match self.storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!("failed to read session token: {}", e);
                None
            }
        }
    }

    /// True only when the stored flag is literally `"true"`.
    ///
    /// This drives UX affordances and the client-side delete gate. It is not
    /// an authorization decision; a forged flag only unlocks requests the
    /// server will still judge on its own.
    pub fn is_admin(&self) -> bool {
        match self.storage.get(ADMIN_KEY) {
            Ok(flag) => flag.as_deref() == Some("true"),
            Err(e) => {
                tracing::warn!("failed to read admin flag: {}", e);
                false
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn clear(&self) -> Result<()> {
        self.storage.clear()?;
        tracing::debug!("session cleared");
        Ok(())
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .field("is_admin", &self.is_admin())
            .finish()
    }
}
