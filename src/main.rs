//! Folio: a flat-file content site server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server ──▶ global cache ──▶ Site::dispatch
//!                                          │                 │
//!                                          │                 ▼
//!                                          │         routing::Router
//!                                          │      (exact → group → scan)
//!                                          │                 │
//!                                          │                 ▼
//!                                          │           controllers
//!                                          │                 │
//!                                          │                 ▼
//!                                          │       content (Markdown files)
//!                                          │                 │
//!     Client Response                      ▼                 ▼
//!     ◀────────────── http::response ◀── cache ◀────────── view
//!
//!     Cross-cutting: config (load/validate/watch), lifecycle
//!     (startup/shutdown), observability (tracing, metrics)
//! ```

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Serve a Markdown content site", long_about = None)]
struct Args {
    /// Path to the site configuration file.
    #[arg(short, long, default_value = "folio.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    folio::lifecycle::startup::run(&args.config).await?;
    Ok(())
}
