//! Prefixed key-value storage.
//!
//! A [`Store`] namespaces keys (`prefix:key`) on top of any
//! [`StorageBackend`] and JSON-encodes values with serde. Storage problems are
//! never surfaced to callers: they are logged and the operation becomes a
//! no-op (or `None` for reads).
//!
//! ```rust
//! use timewarp_store::{MemoryStorage, Store};
//!
//! let store = Store::new(MemoryStorage::shared(), "app");
//! store.set("tab", &"Core");
//! assert_eq!(store.get::<String>("tab").as_deref(), Some("Core"));
//! store.remove("tab");
//! assert_eq!(store.get::<String>("tab"), None);
//! ```

pub mod backend;

use std::borrow::Cow;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use backend::{FileStorage, MemoryStorage, StorageBackend, StoreError};

#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn StorageBackend>,
    prefix: String,
}

impl Store {
    pub fn new(backend: Arc<dyn StorageBackend>, prefix: impl Into<String>) -> Self {
        Self {
            backend,
            prefix: prefix.into(),
        }
    }

    /// Same backend, different namespace.
    pub fn scoped(&self, prefix: impl Into<String>) -> Self {
        Self::new(self.backend.clone(), prefix)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn full_key<'a>(&self, key: &'a str) -> Cow<'a, str> {
        if self.prefix.is_empty() {
            Cow::Borrowed(key)
        } else {
            Cow::Owned(format!("{}:{key}", self.prefix))
        }
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let full = self.full_key(key);
        let raw = match self.backend.get_item(&full) {
            Ok(raw) => raw?,
            Err(e) => {
                log::warn!("Error reading from store ({full}): {e}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("Error reading from store ({full}): {e}");
                None
            }
        }
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let full = self.full_key(key);
        let encoded = match serde_json::to_string(value) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Error writing to store ({full}): {e}");
                return;
            }
        };
        if let Err(e) = self.backend.set_item(&full, encoded) {
            log::warn!("Error writing to store ({full}): {e}");
        }
    }

    pub fn remove(&self, key: &str) {
        let full = self.full_key(key);
        if let Err(e) = self.backend.remove_item(&full) {
            log::warn!("Error removing from store ({full}): {e}");
        }
    }

    /// Removes every key in this store's namespace; the whole backend when
    /// the prefix is empty.
    pub fn clear(&self) {
        if self.prefix.is_empty() {
            if let Err(e) = self.backend.clear() {
                log::warn!("Error clearing store: {e}");
            }
            return;
        }

        let namespace = format!("{}:", self.prefix);
        let keys = match self.backend.keys() {
            Ok(keys) => keys,
            Err(e) => {
                log::warn!("Error clearing store ({namespace}): {e}");
                return;
            }
        };
        for key in keys.iter().filter(|k| k.starts_with(&namespace)) {
            if let Err(e) = self.backend.remove_item(key) {
                log::warn!("Error clearing store ({key}): {e}");
            }
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("prefix", &self.prefix)
            .field("backend", &"<backend>")
            .finish()
    }
}
