//! What a single source file contributes to the symbol table.
//!
//! A [`LanguageExtractor`] turns one file's text into its raw import
//! specifiers and top-level exports. Resolution and symbol building happen
//! in the parser.

use std::path::Path;

use archgram_core::{ParseError, SymbolKind};

/// A top-level exported declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportInfo {
    /// 1-based line of the declaration.
    pub line: usize,
    /// Exported identifier, or `"default"` for anonymous default exports.
    pub name: String,
    /// Kind of declaration.
    pub kind: SymbolKind,
}

/// Result of analyzing a single source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileAnalysis {
    /// Module specifiers in source order: static imports, re-exports,
    /// `require(...)` and dynamic `import(...)` calls with a literal argument.
    pub imports: Vec<String>,
    /// Exported declarations in source order.
    pub exports: Vec<ExportInfo>,
}

/// Per-language import/export extraction.
pub trait LanguageExtractor: Send + Sync {
    /// Name used in errors, such as `"typescript"`.
    fn language_id(&self) -> &'static str;

    /// Handled extensions, without the dot.
    fn extensions(&self) -> &'static [&'static str];

    /// Extracts imports and exports from `source`. `path` selects the
    /// dialect and is used in errors.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the grammar cannot be loaded or tree-sitter
    /// produces no tree.
    fn analyze(&self, path: &Path, source: &str) -> Result<FileAnalysis, ParseError>;

    /// Returns `true` if this extractor handles `path`.
    fn handles(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions().contains(&ext))
    }
}
