//! Cache subsystem.
//!
//! # Data Flow
//! ```text
//! CacheRegistry ("store.key")
//!     → Store trait
//!         → JsonFileStore (cache_dir/<store>/<key>.json)
//!         → MemoryStore
//! ```

pub mod json_file;
pub mod memory;
pub mod registry;
pub mod store;

use std::path::PathBuf;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use registry::{CacheRegistry, GLOBAL_STORE};
pub use store::{CacheMeta, CacheRecord, Store};

/// Cache failures.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cache serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown cache driver: {0}")]
    UnknownDriver(String),

    #[error("unknown cache store: {0}")]
    UnknownStore(String),

    #[error("cache name must be <store>.<key>: {0}")]
    InvalidKey(String),
}
