//! Client session identifiers.
//!
//! A [`SessionIdProvider`] hands out the token a client attaches to every
//! submission. With session-scoped storage the token is generated once and
//! reused for the lifetime of that scope; without storage (a
//! non-interactive context) every call yields a fresh token, so the
//! per-session rate limit gives no guarantee there.
//!
//! The server never issues session ids: this module is the client-side
//! half of the contract, for embedders that build submissions in Rust. The
//! server only receives the token as `session_id` and trusts it as given.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// Storage key under which the session token is kept.
pub const SESSION_STORAGE_KEY: &str = "country_tally_session_id";

/// Opaque per-session token (UUID v4).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generates a new random token.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

/// Key/value storage that lives exactly as long as a browsing session.
pub trait SessionStorage: fmt::Debug + Send + Sync {
    /// Reads a stored value.
    fn get(&self, key: &str) -> Option<String>;
    /// Writes a value, replacing any previous one.
    fn set(&self, key: &str, value: String);
}

/// In-memory storage for a single session scope.
///
/// Clones share the same scope; dropping every clone ends the session.
#[derive(Debug, Clone, Default)]
pub struct ScopedSessionStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl ScopedSessionStorage {
    /// Opens a new, empty session scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for ScopedSessionStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value);
        }
    }
}

/// Produces the session token for the current client.
#[derive(Debug, Clone)]
pub struct SessionIdProvider {
    storage: Option<Arc<dyn SessionStorage>>,
}

impl SessionIdProvider {
    /// Provider backed by session-scoped storage.
    #[must_use]
    pub fn with_storage(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            storage: Some(storage),
        }
    }

    /// Provider for contexts with no persistent storage.
    #[must_use]
    pub const fn ephemeral() -> Self {
        Self { storage: None }
    }

    /// Returns the stored token, generating and storing one on first use.
    #[must_use]
    pub fn get_or_create_session_id(&self) -> SessionId {
        let Some(storage) = &self.storage else {
            return SessionId::generate();
        };
        if let Some(existing) = storage.get(SESSION_STORAGE_KEY).filter(|s| !s.is_empty()) {
            return SessionId(existing);
        }
        let id = SessionId::generate();
        storage.set(SESSION_STORAGE_KEY, id.0.clone());
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_scope_returns_same_id() {
        let provider = SessionIdProvider::with_storage(Arc::new(ScopedSessionStorage::new()));
        let first = provider.get_or_create_session_id();
        let second = provider.get_or_create_session_id();
        assert_eq!(first, second);
        assert_eq!(first.as_str().len(), 36);
    }

    #[test]
    fn new_scope_gets_new_id() {
        let a = SessionIdProvider::with_storage(Arc::new(ScopedSessionStorage::new()));
        let b = SessionIdProvider::with_storage(Arc::new(ScopedSessionStorage::new()));
        assert_ne!(a.get_or_create_session_id(), b.get_or_create_session_id());
    }

    #[test]
    fn id_is_persisted_in_storage() {
        let storage = ScopedSessionStorage::new();
        let provider = SessionIdProvider::with_storage(Arc::new(storage.clone()));
        let id = provider.get_or_create_session_id();
        assert_eq!(storage.get(SESSION_STORAGE_KEY), Some(id.to_string()));
    }

    #[test]
    fn ephemeral_provider_never_repeats() {
        let provider = SessionIdProvider::ephemeral();
        assert_ne!(
            provider.get_or_create_session_id(),
            provider.get_or_create_session_id()
        );
    }
}
