//! Response bodies: the HTML layout, Atom feeds and XML sitemaps.
//!
//! # Data Flow
//! ```text
//! controller
//!     → PageView { doctitle, single, collection, pagination }
//!     → layout.rs (HTML document)
//!
//! feed controller    → feed.rs (Atom)
//! sitemap controllers → sitemap.rs (urlset / sitemapindex)
//! ```

pub mod feed;
pub mod layout;
pub mod pagination;
pub mod sitemap;
pub mod title;

pub use layout::PageView;
pub use pagination::Pagination;
pub use title::DocumentTitle;
