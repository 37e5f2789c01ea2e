use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("storage data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Raw string storage, the shape of a browser's `localStorage`.
pub trait StorageBackend: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&self, key: &str, value: String) -> Result<(), StoreError>;
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
    fn keys(&self) -> Result<Vec<String>, StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

/// Process-local storage.
#[derive(Default)]
pub struct MemoryStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.lock().get(key).cloned())
    }
    fn set_item(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.items.lock().insert(key.to_string(), value);
        Ok(())
    }
    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.items.lock().remove(key);
        Ok(())
    }
    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.items.lock().keys().cloned().collect())
    }
    fn clear(&self) -> Result<(), StoreError> {
        self.items.lock().clear();
        Ok(())
    }
}

/// All items in one JSON object file, rewritten on every change.
/// A missing file reads as empty.
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }
    pub fn shared(path: impl Into<PathBuf>) -> Arc<Self> {
        Arc::new(Self::new(path))
    }
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(s) if s.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(s) => Ok(serde_json::from_str(&s)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, items: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(items)?)?;
        fs::rename(&tmp, &self.path)?;
        log::debug!("store: wrote {} item(s) to {}", items.len(), self.path.display());
        Ok(())
    }

    fn modify(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<(), StoreError> {
        let _guard = self.lock.lock();
        let mut items = self.load()?;
        f(&mut items);
        self.save(&items)
    }
}

impl StorageBackend for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.remove(key))
    }
    fn set_item(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.modify(|items| {
            items.insert(key.to_string(), value);
        })
    }
    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.modify(|items| {
            items.remove(key);
        })
    }
    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.into_keys().collect())
    }
    fn clear(&self) -> Result<(), StoreError> {
        self.modify(BTreeMap::clear)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Store;

    #[test]
    fn test_memory_backend() {
        let m = MemoryStorage::new();
        m.set_item("a", "1".into()).unwrap();
        m.set_item("b", "2".into()).unwrap();
        assert_eq!(m.get_item("a").unwrap().as_deref(), Some("1"));
        assert_eq!(m.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);
        m.remove_item("a").unwrap();
        assert_eq!(m.get_item("a").unwrap(), None);
        m.clear().unwrap();
        assert!(m.keys().unwrap().is_empty());
    }

    #[test]
    fn test_file_backend_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let first = Store::new(FileStorage::shared(&path), "tm");
        first.set("input", &"2024-01-02 03:04");
        drop(first);

        let reopened = Store::new(FileStorage::shared(&path), "tm");
        assert_eq!(
            reopened.get::<String>("input").as_deref(),
            Some("2024-01-02 03:04")
        );
        reopened.clear();
        assert_eq!(reopened.get::<String>("input"), None);
    }

    #[test]
    fn test_file_backend_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let f = FileStorage::new(dir.path().join("absent.json"));
        assert_eq!(f.get_item("x").unwrap(), None);
        assert!(f.keys().unwrap().is_empty());
    }

    #[test]
    fn test_file_backend_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "[1, 2").unwrap();
        let f = FileStorage::new(&path);
        assert!(matches!(f.get_item("x"), Err(StoreError::Json(_))));

        // Reads through a Store degrade to None instead.
        let store = Store::new(Arc::new(f), "");
        assert_eq!(store.get::<i32>("x"), None);
    }
}
