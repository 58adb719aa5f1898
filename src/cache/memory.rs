//! In-process store. Data does not survive a restart.

use dashmap::DashMap;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

use crate::cache::store::{now, CacheRecord, Store};
use crate::cache::CacheError;

#[derive(Debug)]
pub struct MemoryStore {
    name: String,
    data: DashMap<String, CacheRecord>,
}

impl MemoryStore {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            data: DashMap::new(),
        }
    }

    /// Driver factory for the cache registry. The root directory is unused.
    pub fn driver(name: &str, _root: &Path) -> Arc<dyn Store> {
        Arc::new(Self::new(name))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Store for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn record(&self, key: &str) -> Option<CacheRecord> {
        let record = self.data.get(key)?.value().clone();
        if record.is_expired(now()) {
            self.data.remove(key);
            return None;
        }
        Some(record)
    }

    fn put(&self, key: &str, data: Value, seconds: u64) -> Result<(), CacheError> {
        self.data
            .insert(key.to_string(), CacheRecord::new(data, seconds));
        Ok(())
    }

    fn forget(&self, key: &str) -> Result<(), CacheError> {
        self.data.remove(key);
        Ok(())
    }

    fn flush(&self) -> Result<(), CacheError> {
        self.data.clear();
        Ok(())
    }
}
