//! Project walker producing archgram symbols from TypeScript/JavaScript.

use std::collections::HashSet;
use std::path::Path;

use archgram_core::{normalize_path, ParseError, Symbol, SymbolKind, SymbolParser};
use ignore::overrides::OverrideBuilder;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::extractor::{FileAnalysis, LanguageExtractor};
use crate::resolve::resolve;
use crate::typescript::TypeScriptExtractor;

/// Walks a project, parses every supported file and resolves imports.
///
/// Files ignored by `.gitignore` or matching an exclude glob are skipped.
/// Each exported declaration becomes one symbol; a file without exports
/// becomes a single [`SymbolKind::File`] symbol named after its stem. All
/// symbols of a file share that file's resolved dependencies.
pub struct TypeScriptParser {
    extractor: TypeScriptExtractor,
    excludes: Vec<String>,
}

impl TypeScriptParser {
    /// Creates a parser with no exclude globs.
    #[must_use]
    pub fn new() -> Self {
        Self {
            extractor: TypeScriptExtractor::new(),
            excludes: Vec::new(),
        }
    }

    /// Adds exclude globs (gitignore syntax, e.g. `node_modules/`).
    #[must_use]
    pub fn with_excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excludes.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Lists supported files under `root`, relative and sorted.
    fn discover(&self, root: &Path) -> Result<Vec<String>, ParseError> {
        let walk_error = |message: String| ParseError::Walk {
            path: root.to_path_buf(),
            message,
        };

        let mut overrides = OverrideBuilder::new(root);
        for pattern in &self.excludes {
            overrides
                .add(&format!("!{pattern}"))
                .map_err(|e| walk_error(e.to_string()))?;
        }
        let overrides = overrides.build().map_err(|e| walk_error(e.to_string()))?;

        let mut builder = ignore::WalkBuilder::new(root);
        builder
            .hidden(false)
            .git_ignore(true)
            .require_git(false)
            .overrides(overrides);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry.map_err(|e| walk_error(e.to_string()))?;
            let path = entry.path();
            if !entry.file_type().is_some_and(|t| t.is_file()) || !self.extractor.handles(path) {
                continue;
            }
            let rel = path.strip_prefix(root).unwrap_or(path);
            files.push(normalize_path(&rel.to_string_lossy()));
        }

        files.sort();
        Ok(files)
    }

    /// Reads and analyzes one file. A file that cannot be read as UTF-8
    /// text is skipped with a warning.
    fn analyze_file(&self, root: &Path, rel: &str) -> Result<Option<FileAnalysis>, ParseError> {
        let source = match std::fs::read_to_string(root.join(rel)) {
            Ok(source) => source,
            Err(e) => {
                warn!("Skipping {rel}: {e}");
                return Ok(None);
            }
        };
        debug!("Parsing: {rel}");
        self.extractor.analyze(Path::new(rel), &source).map(Some)
    }
}

impl Default for TypeScriptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolParser for TypeScriptParser {
    fn parse(&self, root: &Path) -> Result<Vec<Symbol>, ParseError> {
        let files = self.discover(root)?;
        info!("Parsing {} files under {}", files.len(), root.display());

        let analyses: Vec<Option<FileAnalysis>> = files
            .par_iter()
            .map(|rel| self.analyze_file(root, rel))
            .collect::<Result<_, _>>()?;

        let known: HashSet<String> = files.iter().cloned().collect();
        let symbols = files
            .iter()
            .zip(analyses)
            .filter_map(|(path, analysis)| analysis.map(|a| (path, a)))
            .flat_map(|(path, analysis)| file_symbols(path, analysis, &known))
            .collect();
        Ok(symbols)
    }
}

/// File name without its last extension (`user.test.ts` -> `user.test`).
fn file_stem(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.rsplit_once('.').map_or(name, |(stem, _)| stem)
}

fn file_symbols(path: &str, analysis: FileAnalysis, known: &HashSet<String>) -> Vec<Symbol> {
    let dependencies: Vec<String> = analysis
        .imports
        .iter()
        .filter_map(|specifier| resolve(path, specifier, known))
        .filter(|dep| dep != path)
        .collect();

    if analysis.exports.is_empty() {
        return vec![Symbol::new(path, file_stem(path), SymbolKind::File)
            .with_dependencies(dependencies)];
    }

    analysis
        .exports
        .into_iter()
        .map(|export| {
            Symbol::new(path, export.name, export.kind).with_dependencies(dependencies.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_keeps_inner_dots() {
        assert_eq!(file_stem("src/user.test.ts"), "user.test");
        assert_eq!(file_stem("index.ts"), "index");
        assert_eq!(file_stem("Makefile"), "Makefile");
    }

    #[test]
    fn exportless_file_becomes_file_symbol() {
        let known: HashSet<String> = ["src/a.ts".to_string(), "src/b.ts".to_string()].into();
        let analysis = FileAnalysis {
            imports: vec!["./b".to_string(), "./a".to_string(), "lodash".to_string()],
            exports: vec![],
        };
        let symbols = file_symbols("src/a.ts", analysis, &known);
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].kind, SymbolKind::File);
        assert_eq!(symbols[0].name, "a");
        // Self-imports and externals are dropped.
        assert_eq!(symbols[0].dependencies, vec!["src/b.ts"]);
    }
}
