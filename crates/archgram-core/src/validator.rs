//! Validator trait and the read-only inputs every validator shares.

use std::borrow::Cow;

use tracing::debug;

use crate::source::{ContentCache, SourceFiles};
use crate::symbol::Symbol;
use crate::types::Violation;

/// Inputs shared by every validator during one run.
///
/// Everything here is borrowed and never mutated, so validators can run on
/// separate threads against the same context.
#[derive(Clone, Copy)]
pub struct ValidationContext<'a> {
    /// Symbols with roles assigned.
    pub symbols: &'a [Symbol],
    /// File access for content and existence checks.
    pub files: &'a dyn SourceFiles,
    /// Pre-read content, preferred over `files` when present.
    pub cache: Option<&'a ContentCache>,
}

impl<'a> ValidationContext<'a> {
    /// Creates a context without a content cache.
    #[must_use]
    pub fn new(symbols: &'a [Symbol], files: &'a dyn SourceFiles) -> Self {
        Self {
            symbols,
            files,
            cache: None,
        }
    }

    /// Attaches a content cache.
    #[must_use]
    pub fn with_cache(mut self, cache: &'a ContentCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Returns file content from the cache, falling back to a direct read.
    ///
    /// Unreadable files yield `None`; the caller skips that file for the
    /// current check only.
    #[must_use]
    pub fn content(&self, path: &str) -> Option<Cow<'a, str>> {
        if let Some(content) = self.cache.and_then(|cache| cache.get(path)) {
            return Some(Cow::Borrowed(content.as_str()));
        }
        match self.files.read(path) {
            Ok(content) => Some(Cow::Owned(content)),
            Err(e) => {
                debug!("Skipping unreadable file {path}: {e}");
                None
            }
        }
    }

    /// Checks whether a path exists.
    #[must_use]
    pub fn exists(&self, path: &str) -> bool {
        self.files.exists(path)
    }
}

impl std::fmt::Debug for ValidationContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationContext")
            .field("symbols", &self.symbols.len())
            .field("cached", &self.cache.map(ContentCache::len))
            .finish_non_exhaustive()
    }
}

/// One family of grammar checks.
///
/// A validator owns the rules it evaluates and is a pure function of the
/// context: the same context always yields the same violations in the same
/// order.
pub trait Validator: Send + Sync {
    /// Returns the validator name used in logs (e.g., "dependency").
    fn name(&self) -> &'static str;

    /// Evaluates every owned rule against the context.
    fn validate(&self, ctx: &ValidationContext<'_>) -> Vec<Violation>;
}

/// Type alias for boxed Validator trait objects.
pub type ValidatorBox = Box<dyn Validator>;
