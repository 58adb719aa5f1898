//! Content subsystem.
//!
//! # Data Flow
//! ```text
//! content_dir/<type path>/<slug>.md
//!     → locator.rs (path + slug → file, directory listing)
//!     → entry.rs (front matter + Markdown body)
//!     → query.rs (filter, sort, paginate into a Collection)
//!
//! types.rs resolves which content type a path or URI belongs to.
//! ```

pub mod entry;
pub mod locator;
pub mod markdown;
pub mod query;
pub mod types;

use std::path::PathBuf;

pub use entry::Entry;
pub use locator::ContentLocator;
pub use query::{Collection, Query, QueryArgs};
pub use types::{ContentType, ContentTypeRegistry};

/// Errors reading content from disk.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid front matter in {}: {source}", .path.display())]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
