//! Top-level analyzer wiring grammar, parser, roles and validators.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use archgram_core::grammar::{self, Rule};
use archgram_core::{
    dedup, Config, ContentCache, DiskFiles, Grammar, GrammarError, LintResult, ParseError,
    RoleAssigner, RuleSet, SourceFiles, Symbol, SymbolParser, ValidationContext, Violation,
};
use archgram_ts::TypeScriptParser;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

use crate::orchestrator::Orchestrator;

/// Errors that abort an analysis run.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The grammar could not be found, read or validated.
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    /// The parser failed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// IO error resolving the project root.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The dedicated worker pool could not be created.
    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

enum GrammarSource {
    Path(PathBuf),
    Loaded(Grammar),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    grammar: Option<GrammarSource>,
    config: Option<Config>,
    parser: Option<Box<dyn SymbolParser>>,
    files: Option<Box<dyn SourceFiles>>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the project root to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Loads the grammar from this file (relative paths resolve against the
    /// root).
    #[must_use]
    pub fn grammar_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.grammar = Some(GrammarSource::Path(path.into()));
        self
    }

    /// Uses an already loaded grammar.
    #[must_use]
    pub fn grammar(mut self, grammar: Grammar) -> Self {
        self.grammar = Some(GrammarSource::Loaded(grammar));
        self
    }

    /// Sets the run configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Replaces the default TypeScript parser.
    #[must_use]
    pub fn parser<P: SymbolParser + 'static>(mut self, parser: P) -> Self {
        self.parser = Some(Box::new(parser));
        self
    }

    /// Replaces disk access under the root.
    #[must_use]
    pub fn files<F: SourceFiles + 'static>(mut self, files: F) -> Self {
        self.files = Some(Box::new(files));
        self
    }

    /// Builds the analyzer, loading the grammar.
    ///
    /// The grammar comes from, in order: [`Self::grammar`] or
    /// [`Self::grammar_path`], the config's `analyzer.grammar`, or the first
    /// [`grammar::GRAMMAR_CANDIDATES`] file found in the root.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be resolved or the grammar cannot
    /// be loaded.
    pub fn build(self) -> Result<Analyzer, AnalyzeError> {
        let config = self.config.unwrap_or_default();

        let root = self
            .root
            .unwrap_or_else(|| config.analyzer.root.clone());
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let grammar = match self.grammar {
            Some(GrammarSource::Loaded(grammar)) => grammar,
            Some(GrammarSource::Path(path)) => grammar::load_from_path(&root.join(path))?,
            None => {
                let path = match &config.analyzer.grammar {
                    Some(path) => root.join(path),
                    None => grammar::discover(&root)?,
                };
                grammar::load_from_path(&path)?
            }
        };
        info!(
            "Loaded grammar with {} roles and {} rules",
            grammar.roles.len(),
            grammar.rules.len()
        );

        let parser = self.parser.unwrap_or_else(|| {
            Box::new(TypeScriptParser::new().with_excludes(config.analyzer.exclude.clone()))
        });
        let files = self
            .files
            .unwrap_or_else(|| Box::new(DiskFiles::new(root.clone())));

        Ok(Analyzer {
            root,
            grammar,
            config,
            parser,
            files,
        })
    }
}

/// The main analyzer.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    grammar: Grammar,
    config: Config,
    parser: Box<dyn SymbolParser>,
    files: Box<dyn SourceFiles>,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the project root being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the loaded grammar.
    #[must_use]
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Grammar rules after configuration: disabled rules removed, severity
    /// overrides applied.
    #[must_use]
    pub fn active_rules(&self) -> Vec<Rule> {
        self.grammar
            .rules
            .iter()
            .filter_map(|rule| {
                let active = self.config.apply(rule);
                if active.is_none() {
                    debug!("Skipping disabled rule: {}", rule.meta.name);
                }
                active
            })
            .collect()
    }

    /// Parses the project and validates it against the grammar.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or the worker pool cannot be built.
    pub fn analyze(&self) -> Result<LintResult, AnalyzeError> {
        info!("Starting analysis at {}", self.root.display());

        let rules = RuleSet::from_rules(&self.active_rules());
        let symbols = self.parser.parse(&self.root)?;
        let symbols = RoleAssigner::new(&self.grammar.roles).assign(symbols);
        let files_checked = symbols
            .iter()
            .map(|s| s.path.as_str())
            .collect::<HashSet<_>>()
            .len();

        let violations = match self.config.analyzer.parallelism {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()?;
                pool.install(|| self.validate(&rules, &symbols))
            }
            None => self.validate(&rules, &symbols),
        };
        let violations = dedup(violations);

        info!(
            "Analysis complete: {} violations in {} files",
            violations.len(),
            files_checked
        );

        Ok(LintResult {
            violations,
            files_checked,
            symbols_checked: symbols.len(),
        })
    }

    fn validate(&self, rules: &RuleSet, symbols: &[Symbol]) -> Vec<Violation> {
        let orchestrator = Orchestrator::new(rules);
        if orchestrator.is_empty() {
            return Vec::new();
        }
        debug!("Running validators: {}", orchestrator.names().join(", "));

        let reads_content = rules.has_file_metrics() || rules.has_code_pattern();
        let cache = (self.config.analyzer.preload_content && reads_content)
            .then(|| self.preload(symbols));

        let mut ctx = ValidationContext::new(symbols, self.files.as_ref());
        if let Some(cache) = &cache {
            ctx = ctx.with_cache(cache);
        }
        orchestrator.run(&ctx)
    }

    /// Reads every symbol file once, in parallel. Unreadable files are left
    /// out and fall back to a direct read (and skip) during validation.
    fn preload(&self, symbols: &[Symbol]) -> ContentCache {
        let mut seen = HashSet::new();
        let paths: Vec<&str> = symbols
            .iter()
            .map(|s| s.path.as_str())
            .filter(|path| seen.insert(*path))
            .collect();

        let cache: ContentCache = paths
            .par_iter()
            .filter_map(|&path| match self.files.read(path) {
                Ok(content) => Some((path.to_string(), content)),
                Err(e) => {
                    debug!("Not preloading {path}: {e}");
                    None
                }
            })
            .collect();
        debug!("Preloaded {} of {} files", cache.len(), paths.len());
        cache
    }
}

/// Analyzes the project at `path` with default configuration and the
/// grammar discovered in it.
///
/// # Errors
///
/// Returns an error if no grammar is found or the run fails.
pub fn analyze(path: impl AsRef<Path>) -> Result<LintResult, AnalyzeError> {
    Analyzer::builder()
        .root(path.as_ref())
        .build()?
        .analyze()
}
