//! Object-store abstraction backing the version record and model artifacts.
//!
//! The publisher talks to a [`ObjectStore`] trait object so the pipeline can
//! run against a filesystem-backed bucket in production-like setups and an
//! in-memory store in tests. Keys are opaque strings; `/` separators map to
//! subdirectories in the local backend.
//!
//! # Example
//!
//! ```
//! use publicar::storage::{InMemoryStore, ObjectStore};
//!
//! let store = InMemoryStore::new();
//! store.put("model_version.txt", b"3").unwrap();
//! assert_eq!(store.get("model_version.txt").unwrap(), Some(b"3".to_vec()));
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;

/// Object-store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// A named-object store with GET/PUT semantics and unconditional overwrite.
pub trait ObjectStore: Send + Sync {
    /// Read an object; `Ok(None)` means the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write an object, overwriting any prior value.
    fn put(&self, key: &str, data: &[u8]) -> Result<()>;

    /// Whether the key exists.
    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// All keys beginning with `prefix`, sorted.
    fn list(&self, prefix: &str) -> Result<Vec<String>>;

    /// Backend type name, for log lines.
    fn store_type(&self) -> &'static str;
}

// =============================================================================
// Local Filesystem Store
// =============================================================================

/// Filesystem-backed store: each key is a relative path under a base dir.
#[derive(Debug)]
pub struct LocalStore {
    base_path: PathBuf,
}

impl LocalStore {
    /// Create a store rooted at `base_path`, creating the directory tree.
    pub fn new_and_init(base_path: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    fn key_to_path(&self, key: &str) -> PathBuf {
        // Keys use `/` separators; keep them inside the base dir.
        let relative: PathBuf = key
            .split('/')
            .filter(|part| !part.is_empty() && *part != "." && *part != "..")
            .collect();
        self.base_path.join(relative)
    }

    fn collect_keys(&self, dir: &Path, out: &mut Vec<String>) -> Result<()> {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                self.collect_keys(&path, out)?;
            } else if let Ok(relative) = path.strip_prefix(&self.base_path) {
                let key = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                out.push(key);
            }
        }
        Ok(())
    }
}

impl ObjectStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.key_to_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read(path)?))
    }

    fn put(&self, key: &str, data: &[u8]) -> Result<()> {
        let path = self.key_to_path(key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, data)?;
        Ok(())
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        self.collect_keys(&self.base_path, &mut keys)?;
        keys.retain(|k| k.starts_with(prefix));
        keys.sort();
        Ok(keys)
    }

    fn store_type(&self) -> &'static str {
        "local"
    }
}

// =============================================================================
// In-Memory Store (tests and degraded setups)
// =============================================================================

/// In-memory store. Records every `put` key so tests can assert exact
/// call counts against the publisher.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    objects: RwLock<HashMap<String, Vec<u8>>>,
    put_log: RwLock<Vec<String>>,
}

impl InMemoryStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys of every `put` call, in order, including overwrites.
    pub fn put_log(&self) -> Vec<String> {
        self.put_log.read().unwrap().clone()
    }
}

impl ObjectStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.objects.read().unwrap().get(key).cloned())
    }

    fn put(&self, key: &str, data: &[u8]) -> Result<()> {
        self.objects
            .write()
            .unwrap()
            .insert(key.to_string(), data.to_vec());
        self.put_log.write().unwrap().push(key.to_string());
        Ok(())
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self
            .objects
            .read()
            .unwrap()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }

    fn store_type(&self) -> &'static str {
        "memory"
    }
}

// =============================================================================
// Failing Store (degradation-path test double)
// =============================================================================

/// A store whose every operation fails, for exercising fail-open paths.
#[derive(Debug, Default)]
pub struct FailingStore;

impl FailingStore {
    /// Create a store that always errors.
    pub fn new() -> Self {
        Self
    }
}

impl ObjectStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Err(StoreError::Network(format!("get {key}: connection refused")))
    }

    fn put(&self, key: &str, _data: &[u8]) -> Result<()> {
        Err(StoreError::Network(format!("put {key}: connection refused")))
    }

    fn list(&self, _prefix: &str) -> Result<Vec<String>> {
        Err(StoreError::Network("list: connection refused".to_string()))
    }

    fn store_type(&self) -> &'static str {
        "failing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_in_memory_put_get() {
        let store = InMemoryStore::new();
        store.put("a/b.txt", b"payload").unwrap();
        assert_eq!(store.get("a/b.txt").unwrap(), Some(b"payload".to_vec()));
    }

    #[test]
    fn test_in_memory_get_missing_is_none() {
        let store = InMemoryStore::new();
        assert_eq!(store.get("nope").unwrap(), None);
        assert!(!store.exists("nope").unwrap());
    }

    #[test]
    fn test_in_memory_overwrite() {
        let store = InMemoryStore::new();
        store.put("k", b"1").unwrap();
        store.put("k", b"2").unwrap();
        assert_eq!(store.get("k").unwrap(), Some(b"2".to_vec()));
        assert_eq!(store.put_log(), vec!["k".to_string(), "k".to_string()]);
    }

    #[test]
    fn test_in_memory_list_prefix() {
        let store = InMemoryStore::new();
        store.put("models/a", b"x").unwrap();
        store.put("models/b", b"y").unwrap();
        store.put("other/c", b"z").unwrap();
        assert_eq!(store.list("models/").unwrap(), vec!["models/a", "models/b"]);
    }

    #[test]
    fn test_local_put_get_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new_and_init(tmp.path().to_path_buf()).unwrap();
        store.put("trained_models/model_v1.json", b"{}").unwrap();
        assert_eq!(
            store.get("trained_models/model_v1.json").unwrap(),
            Some(b"{}".to_vec())
        );
        assert!(tmp.path().join("trained_models/model_v1.json").exists());
    }

    #[test]
    fn test_local_get_missing_is_none() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new_and_init(tmp.path().to_path_buf()).unwrap();
        assert_eq!(store.get("absent").unwrap(), None);
    }

    #[test]
    fn test_local_overwrite_is_unconditional() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new_and_init(tmp.path().to_path_buf()).unwrap();
        store.put("version.txt", b"1").unwrap();
        store.put("version.txt", b"2").unwrap();
        assert_eq!(store.get("version.txt").unwrap(), Some(b"2".to_vec()));
    }

    #[test]
    fn test_local_list_recurses_and_sorts() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new_and_init(tmp.path().to_path_buf()).unwrap();
        store.put("m/b", b"1").unwrap();
        store.put("m/a", b"2").unwrap();
        store.put("top", b"3").unwrap();
        assert_eq!(store.list("m/").unwrap(), vec!["m/a", "m/b"]);
        assert_eq!(store.list("").unwrap(), vec!["m/a", "m/b", "top"]);
    }

    #[test]
    fn test_local_key_traversal_is_contained() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new_and_init(tmp.path().to_path_buf()).unwrap();
        store.put("../escape.txt", b"x").unwrap();
        assert!(tmp.path().join("escape.txt").exists());
        assert!(!tmp.path().parent().unwrap().join("escape.txt").exists());
    }

    #[test]
    fn test_failing_store_errors() {
        let store = FailingStore::new();
        assert!(matches!(store.get("k"), Err(StoreError::Network(_))));
        assert!(matches!(store.put("k", b"v"), Err(StoreError::Network(_))));
        assert!(matches!(store.list(""), Err(StoreError::Network(_))));
    }

    #[test]
    fn test_store_type_names() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(InMemoryStore::new().store_type(), "memory");
        assert_eq!(FailingStore::new().store_type(), "failing");
        assert_eq!(
            LocalStore::new_and_init(tmp.path().to_path_buf())
                .unwrap()
                .store_type(),
            "local"
        );
    }
}
