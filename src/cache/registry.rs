//! Named cache stores and the drivers that create them.
//!
//! # Responsibilities
//! - Map driver keys (`json`, `memory`) to store factories
//! - Create stores from configuration
//! - Address data as `store.key` and purge stores
//!
//! # Design Decisions
//! - A dotted name splits at the first dot; `global.blog.post` is key
//!   `blog.post` in store `global`
//! - A name without a dot addresses nothing

use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cache::json_file::JsonFileStore;
use crate::cache::memory::MemoryStore;
use crate::cache::store::Store;
use crate::cache::CacheError;
use crate::config::schema::CacheConfig;

/// Name of the store backing the global response cache.
pub const GLOBAL_STORE: &str = "global";

/// Creates a store from its name and the cache root.
pub type DriverFactory = fn(&str, &Path) -> Arc<dyn Store>;

/// Registered drivers and stores.
pub struct CacheRegistry {
    root: PathBuf,
    drivers: HashMap<String, DriverFactory>,
    stores: HashMap<String, Arc<dyn Store>>,
}

impl std::fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut drivers: Vec<&str> = self.drivers.keys().map(String::as_str).collect();
        drivers.sort_unstable();
        f.debug_struct("CacheRegistry")
            .field("root", &self.root)
            .field("drivers", &drivers)
            .field("stores", &self.stores())
            .finish()
    }
}

impl CacheRegistry {
    /// Registry with the built-in `json` and `memory` drivers and no stores.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let mut drivers: HashMap<String, DriverFactory> = HashMap::new();
        drivers.insert("json".to_string(), JsonFileStore::driver);
        drivers.insert("memory".to_string(), MemoryStore::driver);
        Self {
            root: root.into(),
            drivers,
            stores: HashMap::new(),
        }
    }

    /// Create every configured store. The global store is added with the
    /// `json` driver when global caching is on and no store claims the name.
    pub fn from_config(root: impl Into<PathBuf>, config: &CacheConfig) -> Result<Self, CacheError> {
        let mut registry = Self::new(root);
        for store in &config.stores {
            registry.add_store(&store.name, &store.driver)?;
        }
        if config.global && !registry.store_exists(GLOBAL_STORE) {
            registry.add_store(GLOBAL_STORE, "json")?;
        }
        Ok(registry)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn add_driver(&mut self, name: &str, factory: DriverFactory) {
        self.drivers.insert(name.to_string(), factory);
    }

    pub fn remove_driver(&mut self, name: &str) -> bool {
        self.drivers.remove(name).is_some()
    }

    pub fn driver_exists(&self, name: &str) -> bool {
        self.drivers.contains_key(name)
    }

    /// Create a store with a registered driver, replacing any store of that name.
    pub fn add_store(&mut self, name: &str, driver: &str) -> Result<(), CacheError> {
        let factory = self
            .drivers
            .get(driver)
            .ok_or_else(|| CacheError::UnknownDriver(driver.to_string()))?;
        self.stores
            .insert(name.to_string(), factory(name, &self.root));
        tracing::debug!(store = %name, driver = %driver, "Cache store registered");
        Ok(())
    }

    pub fn remove_store(&mut self, name: &str) -> bool {
        self.stores.remove(name).is_some()
    }

    pub fn store_exists(&self, name: &str) -> bool {
        self.stores.contains_key(name)
    }

    pub fn store(&self, name: &str) -> Option<Arc<dyn Store>> {
        self.stores.get(name).cloned()
    }

    /// Store names, sorted.
    pub fn stores(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.stores.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn resolve(&self, name: &str) -> Result<(Arc<dyn Store>, String), CacheError> {
        let (store, key) = name
            .split_once('.')
            .filter(|(s, k)| !s.is_empty() && !k.is_empty())
            .ok_or_else(|| CacheError::InvalidKey(name.to_string()))?;
        let store = self
            .store(store)
            .ok_or_else(|| CacheError::UnknownStore(store.to_string()))?;
        Ok((store, key.to_string()))
    }

    /// Data stored under `store.key`.
    pub fn get(&self, name: &str) -> Option<Value> {
        let (store, key) = self.resolve(name).ok()?;
        store.get(&key)
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn put(&self, name: &str, data: Value, seconds: u64) -> Result<(), CacheError> {
        let (store, key) = self.resolve(name)?;
        store.put(&key, data, seconds)
    }

    pub fn forget(&self, name: &str) -> Result<(), CacheError> {
        let (store, key) = self.resolve(name)?;
        store.forget(&key)
    }

    /// Flush one store. Returns false when no such store exists.
    pub fn flush(&self, store: &str) -> Result<bool, CacheError> {
        match self.store(store) {
            Some(s) => {
                s.flush()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Flush every store.
    pub fn purge(&self) -> Result<(), CacheError> {
        for store in self.stores.values() {
            store.flush()?;
        }
        tracing::info!(stores = self.stores.len(), "All cache stores purged");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::CacheStoreConfig;
    use serde_json::json;

    #[test]
    fn test_store_key_addressing() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = CacheRegistry::new(dir.path());
        cache.add_store("content", "memory").unwrap();

        cache.put("content.blog.post", json!("x"), 0).unwrap();
        assert_eq!(cache.get("content.blog.post"), Some(json!("x")));
        assert_eq!(cache.store("content").unwrap().get("blog.post"), Some(json!("x")));

        assert!(matches!(
            cache.put("nowhere.k", json!(1), 0),
            Err(CacheError::UnknownStore(_))
        ));
        assert!(matches!(
            cache.put("nodot", json!(1), 0),
            Err(CacheError::InvalidKey(_))
        ));
        assert!(!cache.has("nodot"));
    }

    #[test]
    fn test_unknown_driver() {
        let mut cache = CacheRegistry::new("cache");
        assert!(matches!(
            cache.add_store("s", "redis"),
            Err(CacheError::UnknownDriver(_))
        ));
        cache.add_driver("redis", MemoryStore::driver);
        assert!(cache.add_store("s", "redis").is_ok());
        assert!(cache.remove_driver("redis"));
        assert!(!cache.driver_exists("redis"));
    }

    #[test]
    fn test_from_config_adds_global() {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfig {
            global: true,
            stores: vec![CacheStoreConfig {
                name: "content".into(),
                driver: "memory".into(),
            }],
            ..CacheConfig::default()
        };
        let cache = CacheRegistry::from_config(dir.path(), &config).unwrap();
        assert_eq!(cache.stores(), ["content", "global"]);
    }

    #[test]
    fn test_flush_and_purge() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = CacheRegistry::new(dir.path());
        cache.add_store("a", "json").unwrap();
        cache.add_store("b", "memory").unwrap();
        cache.put("a.k", json!(1), 0).unwrap();
        cache.put("b.k", json!(2), 0).unwrap();

        assert!(cache.flush("a").unwrap());
        assert!(!cache.flush("missing").unwrap());
        assert!(!cache.has("a.k"));
        assert!(cache.has("b.k"));

        cache.purge().unwrap();
        assert!(!cache.has("b.k"));
    }
}
