//! The store interface shared by cache drivers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::CacheError;

/// Current Unix time in seconds.
pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Expiry timestamp for a lifetime in seconds; 0 means never.
pub fn available_at(seconds: u64) -> i64 {
    if seconds == 0 {
        0
    } else {
        now().saturating_add(i64::try_from(seconds).unwrap_or(i64::MAX))
    }
}

/// Timestamps stored next to cached data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct CacheMeta {
    /// Unix time after which the data is stale; 0 never expires.
    pub expires: i64,
    pub created: i64,
}

/// A cached value with its metadata. This is also the on-disk JSON layout.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CacheRecord {
    pub meta: CacheMeta,
    pub data: Value,
}

impl CacheRecord {
    pub fn new(data: Value, seconds: u64) -> Self {
        Self {
            meta: CacheMeta {
                expires: available_at(seconds),
                created: now(),
            },
            data,
        }
    }

    pub fn is_expired(&self, at: i64) -> bool {
        self.meta.expires != 0 && self.meta.expires <= at
    }
}

/// A named key/value store with expiry.
pub trait Store: Send + Sync + std::fmt::Debug {
    /// Store name.
    fn name(&self) -> &str;

    /// The live record for `key`. Expired records are removed and yield `None`.
    fn record(&self, key: &str) -> Option<CacheRecord>;

    /// Write or replace data. `seconds` of 0 never expires.
    fn put(&self, key: &str, data: Value, seconds: u64) -> Result<(), CacheError>;

    /// Delete data if it exists.
    fn forget(&self, key: &str) -> Result<(), CacheError>;

    /// Delete all data in the store.
    fn flush(&self) -> Result<(), CacheError>;

    fn get(&self, key: &str) -> Option<Value> {
        self.record(key).map(|r| r.data)
    }

    fn has(&self, key: &str) -> bool {
        self.record(key).is_some()
    }

    /// Write only if no live data exists. Returns whether it wrote.
    fn add(&self, key: &str, data: Value, seconds: u64) -> Result<bool, CacheError> {
        if self.has(key) {
            return Ok(false);
        }
        self.put(key, data, seconds)?;
        Ok(true)
    }

    fn forever(&self, key: &str, data: Value) -> Result<(), CacheError> {
        self.put(key, data, 0)
    }

    /// Cached data, or the result of `make` written with the given lifetime.
    fn remember(
        &self,
        key: &str,
        seconds: u64,
        make: &dyn Fn() -> Value,
    ) -> Result<Value, CacheError> {
        if let Some(data) = self.get(key) {
            return Ok(data);
        }
        let data = make();
        self.put(key, data.clone(), seconds)?;
        Ok(data)
    }

    fn remember_forever(&self, key: &str, make: &dyn Fn() -> Value) -> Result<Value, CacheError> {
        self.remember(key, 0, make)
    }

    /// Read then delete.
    fn pull(&self, key: &str) -> Result<Option<Value>, CacheError> {
        let data = self.get(key);
        if data.is_some() {
            self.forget(key)?;
        }
        Ok(data)
    }

    fn created(&self, key: &str) -> Option<i64> {
        self.record(key).map(|r| r.meta.created)
    }

    fn expires(&self, key: &str) -> Option<i64> {
        self.record(key).map(|r| r.meta.expires)
    }

    /// True when there is no live data for `key`.
    fn expired(&self, key: &str) -> bool {
        !self.has(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_expiry() {
        let forever = CacheRecord::new(Value::Null, 0);
        assert_eq!(forever.meta.expires, 0);
        assert!(!forever.is_expired(i64::MAX));

        let short = CacheRecord::new(Value::Null, 60);
        assert!(!short.is_expired(now()));
        assert!(short.is_expired(now() + 61));
    }
}
