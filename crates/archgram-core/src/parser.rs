//! The symbol parser seam.
//!
//! A parser turns a project directory into the flat symbol list the
//! validators run on. Paths in the returned symbols are relative to the
//! project root with forward slashes; dependencies are resolved to project
//! file paths and external modules are omitted.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::symbol::Symbol;

/// Errors a parser may report. Any of them aborts the run.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The project directory could not be walked.
    #[error("failed to walk {path}: {message}")]
    Walk {
        /// Directory being walked.
        path: PathBuf,
        /// Walker error message.
        message: String,
    },

    /// A source file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The tree-sitter language could not be loaded.
    #[error("failed to load {language} language: {message}")]
    Language {
        /// Language name.
        language: &'static str,
        /// Loader error message.
        message: String,
    },

    /// Tree-sitter returned no tree for a file.
    #[error("failed to parse {path}")]
    Syntax {
        /// File that failed.
        path: PathBuf,
    },
}

/// Extracts symbols from a project tree.
pub trait SymbolParser: Send + Sync {
    /// Parses every source file under `root`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the tree cannot be walked or a file cannot
    /// be read or parsed.
    fn parse(&self, root: &Path) -> Result<Vec<Symbol>, ParseError>;
}

/// A parser that returns a fixed symbol list, regardless of `root`.
///
/// Useful when symbols come from another tool or from a test fixture.
#[derive(Debug, Clone, Default)]
pub struct StaticSymbols(pub Vec<Symbol>);

impl SymbolParser for StaticSymbols {
    fn parse(&self, _root: &Path) -> Result<Vec<Symbol>, ParseError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolKind;

    #[test]
    fn static_symbols_ignore_root() {
        let parser = StaticSymbols(vec![Symbol::new("src/a.ts", "A", SymbolKind::Class)]);
        let symbols = parser.parse(Path::new("/nowhere")).unwrap();
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].path, "src/a.ts");
    }

    #[test]
    fn errors_name_the_file() {
        let err = ParseError::Syntax {
            path: PathBuf::from("src/broken.ts"),
        };
        assert_eq!(err.to_string(), "failed to parse src/broken.ts");
    }
}
