//! Folio: a flat-file content site server library.

pub mod cache;
pub mod config;
pub mod content;
pub mod controllers;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod site;
pub mod view;

pub use config::schema::SiteConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use site::Site;
