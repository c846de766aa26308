//! Bearer credential store
//!
//! Single source of truth for the token within a running process, mirrored to
//! durable storage so it survives restarts. Validity is never checked here;
//! only the backend decides whether a token is still good.

use eegdash_common::storage::{DurableStorage, TOKEN_KEY};
use std::sync::{Arc, RwLock};
use tracing::warn;

pub struct TokenStore {
    storage: Arc<dyn DurableStorage>,
    token: RwLock<Option<String>>,
}

impl TokenStore {
    /// Memory starts empty; [`TokenStore::get_token`] hydrates lazily
    pub fn new(storage: Arc<dyn DurableStorage>) -> Self {
        Self {
            storage,
            token: RwLock::new(None),
        }
    }

    /// Store in memory and durable storage
    pub fn set_token(&self, token: &str) -> eegdash_common::Result<()> {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
        self.storage.set(TOKEN_KEY, token)
    }

    /// Memory copy if present, else hydrate from durable storage
    pub fn get_token(&self) -> Option<String> {
        if let Some(token) = self.token.read().unwrap_or_else(|e| e.into_inner()).clone() {
            return Some(token);
        }

        let stored = match self.storage.get(TOKEN_KEY) {
            Ok(stored) => stored.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!("Failed to read stored token: {}", e);
                None
            }
        };

        if let Some(token) = &stored {
            *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token.clone());
        }
        stored
    }

    /// Wipe memory and durable storage
    pub fn clear_token(&self) -> eegdash_common::Result<()> {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
        self.storage.remove(TOKEN_KEY)
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the credential
        let present = self.token.read().map(|t| t.is_some()).unwrap_or(false);
        f.debug_struct("TokenStore").field("in_memory", &present).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eegdash_common::MemoryStorage;

    #[test]
    fn test_set_get_clear() {
        let storage = Arc::new(MemoryStorage::new());
        let store = TokenStore::new(storage.clone());

        assert_eq!(store.get_token(), None);
        store.set_token("abc").unwrap();
        assert_eq!(store.get_token().as_deref(), Some("abc"));
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));

        store.clear_token().unwrap();
        assert_eq!(store.get_token(), None);
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_hydrates_after_restart() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "persisted").unwrap();

        // Fresh store, empty memory
        let store = TokenStore::new(storage);
        assert_eq!(store.get_token().as_deref(), Some("persisted"));
    }

    #[test]
    fn test_debug_hides_token() {
        let store = TokenStore::new(Arc::new(MemoryStorage::new()));
        store.set_token("secret-value").unwrap();
        let rendered = format!("{:?}", store);
        assert!(!rendered.contains("secret-value"));
    }
}
