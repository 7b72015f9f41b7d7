//! Check command implementation.

use anyhow::{Context, Result};
use archgram::Analyzer;
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the check command. Exits with status 1 when any error-severity
/// violation is found.
pub fn run(
    path: &Path,
    format: OutputFormat,
    grammar: Option<&Path>,
    source: &ConfigSource,
) -> Result<()> {
    let config = source.load()?;

    let mut builder = Analyzer::builder().root(path).config(config);
    if let Some(grammar) = grammar {
        // Relative to where the command runs, not to the project.
        let grammar = std::env::current_dir()
            .context("Failed to resolve the working directory")?
            .join(grammar);
        builder = builder.grammar_path(grammar);
    }

    let analyzer = builder.build().context("Failed to load grammar")?;

    tracing::info!(
        "Checking {} against {} rules",
        analyzer.root().display(),
        analyzer.active_rules().len()
    );

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, format)?;

    if result.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}
