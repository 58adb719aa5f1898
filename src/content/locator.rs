//! Maps content paths and slugs to Markdown files on disk.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::content::entry::Entry;
use crate::content::ContentError;

/// File extension of content entries.
pub const EXTENSION: &str = "md";

/// Locates entries under a content root.
#[derive(Debug, Clone)]
pub struct ContentLocator {
    root: PathBuf,
}

impl ContentLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for a content path. `None` if the path tries to escape the root.
    pub fn dir(&self, path: &str) -> Option<PathBuf> {
        let mut dir = self.root.clone();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            if !is_safe_segment(segment) {
                return None;
            }
            dir.push(segment);
        }
        Some(dir)
    }

    /// File path for an entry.
    pub fn file(&self, path: &str, slug: &str) -> Option<PathBuf> {
        if slug.is_empty() || slug.contains('/') || !is_safe_segment(slug) {
            return None;
        }
        Some(self.dir(path)?.join(format!("{slug}.{EXTENSION}")))
    }

    /// Load one entry, or `None` when it does not exist.
    pub fn find(&self, path: &str, slug: &str) -> Result<Option<Entry>, ContentError> {
        let Some(file) = self.file(path, slug) else {
            return Ok(None);
        };
        match fs::read_to_string(&file) {
            Ok(raw) => Entry::parse(path, slug, &raw, &file).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ContentError::Io { path: file, source }),
        }
    }

    /// All entries directly inside a content directory, sorted by file name.
    pub fn list(&self, path: &str) -> Result<Vec<Entry>, ContentError> {
        let Some(dir) = self.dir(path) else {
            return Ok(Vec::new());
        };
        let read = match fs::read_dir(&dir) {
            Ok(read) => read,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(ContentError::Io { path: dir, source }),
        };

        let mut files = Vec::new();
        for item in read {
            let item = item.map_err(|source| ContentError::Io {
                path: dir.clone(),
                source,
            })?;
            let file = item.path();
            if file.is_file() && file.extension().is_some_and(|ext| ext == EXTENSION) {
                files.push(file);
            }
        }
        files.sort();

        let mut entries = Vec::with_capacity(files.len());
        for file in files {
            let Some(slug) = file.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let raw = fs::read_to_string(&file).map_err(|source| ContentError::Io {
                path: file.clone(),
                source,
            })?;
            entries.push(Entry::parse(path, slug, &raw, &file)?);
        }
        Ok(entries)
    }
}

fn is_safe_segment(segment: &str) -> bool {
    segment != ".." && !segment.starts_with('.') && !segment.contains('\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_and_list() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs/b.md"), "B").unwrap();
        fs::write(dir.path().join("docs/a.md"), "A").unwrap();
        fs::write(dir.path().join("docs/notes.txt"), "x").unwrap();

        let locator = ContentLocator::new(dir.path());
        let entry = locator.find("docs", "a").unwrap().unwrap();
        assert_eq!(entry.location(), "docs/a");
        assert!(locator.find("docs", "missing").unwrap().is_none());

        let slugs: Vec<_> = locator
            .list("/docs/")
            .unwrap()
            .iter()
            .map(|e| e.slug().to_string())
            .collect();
        assert_eq!(slugs, ["a", "b"]);
        assert!(locator.list("nowhere").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_traversal() {
        let locator = ContentLocator::new("/srv/content");
        assert!(locator.dir("../etc").is_none());
        assert!(locator.file("docs", "..").is_none());
        assert!(locator.file("docs", ".hidden").is_none());
        assert!(locator.find("../../etc", "passwd").unwrap().is_none());
    }
}
