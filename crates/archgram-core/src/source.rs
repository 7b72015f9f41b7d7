//! File access for content-based checks.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Relative path → file content, filled once before validation starts.
pub type ContentCache = HashMap<String, String>;

/// Read access to project files by project-relative path.
pub trait SourceFiles: Send + Sync {
    /// Reads a file. Fails if the file is missing or unreadable.
    ///
    /// # Errors
    ///
    /// Returns the underlying IO error.
    fn read(&self, path: &str) -> io::Result<String>;

    /// Checks whether a file or directory exists.
    fn exists(&self, path: &str) -> bool;
}

/// Files on disk, resolved against a project root.
#[derive(Debug, Clone)]
pub struct DiskFiles {
    root: PathBuf,
}

impl DiskFiles {
    /// Creates a disk accessor rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl SourceFiles for DiskFiles {
    fn read(&self, path: &str) -> io::Result<String> {
        std::fs::read_to_string(self.resolve(path))
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).exists()
    }
}

/// In-memory files, for tests and for callers that already hold content.
///
/// Directories exist implicitly when some file lives under them.
#[derive(Debug, Clone, Default)]
pub struct MemoryFiles {
    files: HashMap<String, String>,
}

impl MemoryFiles {
    /// Creates an empty file set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// Adds or replaces a file.
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }
}

impl SourceFiles for MemoryFiles {
    fn read(&self, path: &str) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.to_string()))
    }

    fn exists(&self, path: &str) -> bool {
        if self.files.contains_key(path) {
            return true;
        }
        let dir = format!("{}/", path.trim_end_matches('/'));
        self.files.keys().any(|file| file.starts_with(&dir))
    }
}
