//! Content scans: forbidden keywords, forbidden patterns and barrel purity.
//!
//! Each scan reports at most one finding per file per rule; the first
//! keyword or pattern (in rule order) that hits is the one reported.

use archgram_core::grammar::{BarrelRule, KeywordRule, PatternRule};
use archgram_core::{Symbol, TypedRule, ValidationContext, Validator, Violation};
use rayon::prelude::*;
use regex::Regex;

use crate::utils::{compile_pattern, compile_patterns, distinct_files, files_with_role};

/// Evaluates `forbidden_keywords`, `forbidden_patterns` and `barrel_purity`
/// rules.
#[derive(Debug, Clone, Default)]
pub struct CodePatternValidator {
    keywords: Vec<TypedRule<KeywordRule>>,
    patterns: Vec<TypedRule<PatternRule>>,
    barrels: Vec<TypedRule<BarrelRule>>,
}

impl CodePatternValidator {
    /// Creates a validator for the given rules.
    #[must_use]
    pub fn new(
        keywords: Vec<TypedRule<KeywordRule>>,
        patterns: Vec<TypedRule<PatternRule>>,
        barrels: Vec<TypedRule<BarrelRule>>,
    ) -> Self {
        Self {
            keywords,
            patterns,
            barrels,
        }
    }
}

impl Validator for CodePatternValidator {
    fn name(&self) -> &'static str {
        "code-pattern"
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();

        for rule in &self.keywords {
            let files = files_with_role(ctx.symbols, &rule.body.from);
            violations.extend(scan(&files, ctx, |symbol, content| {
                let keyword = rule.body.keywords.iter().find(|k| content.contains(k.as_str()))?;
                let finding = format!("'{}' contains forbidden keyword '{keyword}'", symbol.path);
                Some(
                    rule.meta
                        .violation(&symbol.path, &finding)
                        .with_from_role(&symbol.role),
                )
            }));
        }

        for rule in &self.patterns {
            let compiled = compile_patterns(&rule.meta.name, &rule.body.patterns);
            let files = files_with_role(ctx.symbols, &rule.body.from);
            violations.extend(scan(&files, ctx, |symbol, content| {
                let pattern = first_match(&compiled, content)?;
                let finding = format!("'{}' matches forbidden pattern `{pattern}`", symbol.path);
                Some(
                    rule.meta
                        .violation(&symbol.path, &finding)
                        .with_from_role(&symbol.role),
                )
            }));
        }

        for rule in &self.barrels {
            let Some(file_pattern) = compile_pattern(&rule.meta.name, &rule.body.file_pattern)
            else {
                continue;
            };
            let compiled = compile_patterns(&rule.meta.name, &rule.body.patterns);
            let files = distinct_files(ctx.symbols.iter().filter(|s| file_pattern.is_match(&s.path)));
            violations.extend(scan(&files, ctx, |symbol, content| {
                let pattern = first_match(&compiled, content)?;
                let finding = format!(
                    "barrel file '{}' should only re-export, but matches `{pattern}`",
                    symbol.path
                );
                Some(rule.meta.violation(&symbol.path, &finding))
            }));
        }

        violations
    }
}

fn first_match<'p>(compiled: &'p [(String, Regex)], content: &str) -> Option<&'p str> {
    compiled
        .iter()
        .find(|(_, re)| re.is_match(content))
        .map(|(raw, _)| raw.as_str())
}

/// Runs `check` over the readable files in parallel, keeping file order.
fn scan<F>(files: &[&Symbol], ctx: &ValidationContext<'_>, check: F) -> Vec<Violation>
where
    F: Fn(&Symbol, &str) -> Option<Violation> + Sync,
{
    files
        .par_iter()
        .filter_map(|&symbol| {
            let content = ctx.content(&symbol.path)?;
            check(symbol, &content)
        })
        .collect()
}
