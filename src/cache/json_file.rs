//! File-backed store: one pretty-printed JSON file per key.

use dashmap::DashMap;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::cache::store::{now, CacheRecord, Store};
use crate::cache::CacheError;

/// JSON file store rooted at `<cache_dir>/<name>/`.
///
/// Reads are served from memory once loaded. Writes go to a temporary file
/// that is renamed over the target, and a store-wide lock serializes writers.
#[derive(Debug)]
pub struct JsonFileStore {
    name: String,
    dir: PathBuf,
    data: DashMap<String, CacheRecord>,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(name: &str, root: &Path) -> Self {
        Self {
            name: name.to_string(),
            dir: root.join(name),
            data: DashMap::new(),
            write_lock: Mutex::new(()),
        }
    }

    /// Driver factory for the cache registry.
    pub fn driver(name: &str, root: &Path) -> Arc<dyn Store> {
        Arc::new(Self::new(name, root))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn filepath(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key.replace(['/', '\\'], ".")))
    }

    fn read_file(&self, key: &str) -> Option<CacheRecord> {
        let path = self.filepath(key);
        let contents = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(store = %self.name, key = %key, error = %e, "Discarding unreadable cache file");
                None
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Store for JsonFileStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn record(&self, key: &str) -> Option<CacheRecord> {
        let record = match self.data.get(key) {
            Some(r) => r.value().clone(),
            None => self.read_file(key)?,
        };

        if record.is_expired(now()) {
            if let Err(e) = self.forget(key) {
                tracing::warn!(store = %self.name, key = %key, error = %e, "Failed to remove expired cache entry");
            }
            return None;
        }

        self.data.insert(key.to_string(), record.clone());
        Some(record)
    }

    fn put(&self, key: &str, data: Value, seconds: u64) -> Result<(), CacheError> {
        let record = CacheRecord::new(data, seconds);
        let json = serde_json::to_string_pretty(&record)?;
        let path = self.filepath(key);
        let tmp = self
            .dir
            .join(format!(".{}.tmp", uuid::Uuid::new_v4()));

        let _guard = self.lock();
        fs::create_dir_all(&self.dir).map_err(|source| CacheError::Io {
            path: self.dir.clone(),
            source,
        })?;
        fs::write(&tmp, json).map_err(|source| CacheError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| CacheError::Io {
            path: path.clone(),
            source,
        })?;

        self.data.insert(key.to_string(), record);
        Ok(())
    }

    fn forget(&self, key: &str) -> Result<(), CacheError> {
        let _guard = self.lock();
        self.data.remove(key);
        let path = self.filepath(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CacheError::Io { path, source }),
        }
    }

    fn flush(&self) -> Result<(), CacheError> {
        let _guard = self.lock();
        self.data.clear();

        let read = match fs::read_dir(&self.dir) {
            Ok(read) => read,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(source) => {
                return Err(CacheError::Io {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        for item in read.flatten() {
            let path = item.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(&path).map_err(|source| CacheError::Io {
                    path: path.clone(),
                    source,
                })?;
            }
        }
        tracing::info!(store = %self.name, "Cache store flushed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_put_get_survives_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new("global", dir.path());
        store.put("index", json!("<p>hi</p>"), 0).unwrap();
        assert_eq!(store.get("index"), Some(json!("<p>hi</p>")));

        let reopened = JsonFileStore::new("global", dir.path());
        assert_eq!(reopened.get("index"), Some(json!("<p>hi</p>")));
        assert!(reopened.created("index").is_some());
        assert_eq!(reopened.expires("index"), Some(0));
    }

    #[test]
    fn test_file_layout() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new("content", dir.path());
        store.put("blog/post", json!({"a": 1}), 60).unwrap();

        let raw = fs::read_to_string(dir.path().join("content/blog.post.json")).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["data"], json!({"a": 1}));
        assert!(value["meta"]["expires"].as_i64().unwrap() > 0);
        assert!(value["meta"]["created"].as_i64().is_some());
    }

    #[test]
    fn test_expired_file_is_removed_on_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new("global", dir.path());
        fs::create_dir_all(store.dir()).unwrap();
        let stale = CacheRecord {
            meta: crate::cache::store::CacheMeta {
                expires: 1,
                created: 0,
            },
            data: json!("old"),
        };
        let path = store.dir().join("old.json");
        fs::write(&path, serde_json::to_string(&stale).unwrap()).unwrap();

        assert!(store.get("old").is_none());
        assert!(!path.exists());
        assert!(store.expired("old"));
    }

    #[test]
    fn test_forget_pull_and_flush() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new("s", dir.path());
        store.put("a", json!(1), 0).unwrap();
        store.put("b", json!(2), 0).unwrap();

        assert_eq!(store.pull("a").unwrap(), Some(json!(1)));
        assert!(!store.has("a"));

        assert!(!store.add("b", json!(3), 0).unwrap());
        store.flush().unwrap();
        assert!(!store.has("b"));
        assert!(JsonFileStore::new("s", dir.path()).get("b").is_none());
    }

    #[test]
    fn test_remember_computes_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new("s", dir.path());
        let calls = std::cell::Cell::new(0);
        let make = || {
            calls.set(calls.get() + 1);
            json!("v")
        };
        assert_eq!(store.remember("k", 0, &make).unwrap(), json!("v"));
        assert_eq!(store.remember("k", 0, &make).unwrap(), json!("v"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_concurrent_writers_leave_valid_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonFileStore::new("s", dir.path()));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || store.put("shared", json!(i), 0).unwrap())
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let reopened = JsonFileStore::new("s", dir.path());
        assert!(reopened.get("shared").unwrap().is_i64());
    }
}
