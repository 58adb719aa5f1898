//! Shared utilities for integration tests.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use folio::config::parse_config;
use folio::{HttpServer, Shutdown, Site, SiteConfig};

/// A running server with its content directory.
pub struct TestSite {
    pub addr: SocketAddr,
    pub dir: TempDir,
    pub shutdown: Shutdown,
    #[allow(dead_code)]
    pub config_tx: mpsc::UnboundedSender<SiteConfig>,
}

impl TestSite {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestSite {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// A small blog: posts with date archives and a feed, a tag taxonomy and a
/// couple of top-level pages.
pub fn write_content(root: &Path) {
    write(root, "index.md", "---\ntitle: Home\n---\nWelcome home.");
    write(root, "about.md", "---\ntitle: About\n---\nAbout **us**.");
    write(root, "docs/index.md", "---\ntitle: Docs\n---\nDocumentation.");
    write(root, "_error/404.md", "---\ntitle: Lost\n---\nNo such page.");

    write(root, "posts/index.md", "---\ntitle: Blog\n---\nAll posts.");
    write(
        root,
        "posts/hello.md",
        "---\ntitle: Hello World\ndate: 2024-03-05 09:07:00\nauthor: ada\ntag: [rust]\n---\nFirst post.",
    );
    write(
        root,
        "posts/second.md",
        "---\ntitle: Second Post\ndate: 2024-04-10\ntag: [web]\n---\nAnother.",
    );
    write(
        root,
        "posts/_draft.md",
        "---\ntitle: Draft\ndate: 2024-05-01\n---\nNot yet.",
    );

    write(root, "tags/rust.md", "---\ntitle: Rust\n---\nPosts about Rust.");
}

/// Configuration for the fixture content rooted at `dir`.
pub fn config(dir: &Path, extra: &str) -> SiteConfig {
    let toml = format!(
        r#"
[app]
url = "http://example.test"
title = "Test Site"
tagline = "Just testing"
sitemap = true

[paths]
content_dir = "{content}"
cache_dir = "{cache}"

[[content]]
name = "post"
path = "posts"
uri = "blog"
feed = true
date_archives = true

[[content]]
name = "tag"
path = "tags"
taxonomy = true
term_collect = "post"

{extra}
"#,
        content = dir.join("content").display(),
        cache = dir.join("cache").display(),
    );
    parse_config(&toml).unwrap()
}

/// Write fixture content, build the site and serve it on an ephemeral port.
pub async fn start_site(extra: &str) -> TestSite {
    let dir = tempfile::tempdir().unwrap();
    write_content(&dir.path().join("content"));
    let config = config(dir.path(), extra);
    start_with(dir, config).await
}

pub async fn start_with(dir: TempDir, config: SiteConfig) -> TestSite {
    let site = Site::build(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let shutdown_rx = shutdown.subscribe();
    let (config_tx, config_rx) = mpsc::unbounded_channel();

    let server = HttpServer::new(site);
    tokio::spawn(async move {
        server.run(listener, config_rx, shutdown_rx).await.unwrap();
    });

    TestSite {
        addr,
        dir,
        shutdown,
        config_tx,
    }
}
