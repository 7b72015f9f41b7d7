//! Codebase hygiene: near-duplicate file names and unreferenced symbols.

use std::collections::HashMap;

use archgram_core::grammar::{SynonymRule, UnreferencedRule};
use archgram_core::{SymbolKind, TypedRule, ValidationContext, Validator, Violation};
use regex::Regex;

use crate::similarity::jaro_winkler;
use crate::utils::{compile_pattern, compile_patterns, files_with_role};

/// Source extensions stripped before names are compared.
const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs", "mts", "cts"];

/// Role-like suffixes that do not make two names different.
const NOISE_SUFFIXES: &[&str] = &[
    "usecase",
    "use-case",
    "implementation",
    "impl",
    "adapter",
    "repository",
    "controller",
    "service",
    "factory",
    "builder",
    "creator",
    "generator",
];

const SUFFIX_SEPARATORS: &[&str] = &["-", "_", "."];

/// Evaluates `find_synonyms` and `detect_unreferenced` rules.
#[derive(Debug, Clone, Default)]
pub struct HygieneValidator {
    synonyms: Vec<TypedRule<SynonymRule>>,
    unreferenced: Vec<TypedRule<UnreferencedRule>>,
}

impl HygieneValidator {
    /// Creates a validator for the given rules.
    #[must_use]
    pub fn new(
        synonyms: Vec<TypedRule<SynonymRule>>,
        unreferenced: Vec<TypedRule<UnreferencedRule>>,
    ) -> Self {
        Self {
            synonyms,
            unreferenced,
        }
    }

    fn check_synonyms(
        rule: &TypedRule<SynonymRule>,
        ctx: &ValidationContext<'_>,
    ) -> Vec<Violation> {
        let thesaurus = Thesaurus::new(&rule.meta.name, &rule.body.thesaurus);
        let files: Vec<(&str, String)> = files_with_role(ctx.symbols, &rule.body.target)
            .into_iter()
            .map(|s| (s.path.as_str(), thesaurus.apply(&normalize_name(s.file_name()))))
            .collect();

        let mut violations = Vec::new();
        for (i, (path_a, name_a)) in files.iter().enumerate() {
            for (path_b, name_b) in &files[i + 1..] {
                let score = jaro_winkler(name_a, name_b);
                if score < rule.body.similarity_threshold {
                    continue;
                }
                let finding = format!(
                    "'{path_a}' and '{path_b}' have near-identical names ({}% similar)",
                    (score * 100.0).round()
                );
                violations.push(
                    rule.meta
                        .violation(*path_a, &finding)
                        .with_dependency(*path_b),
                );
            }
        }
        violations
    }

    fn check_unreferenced(
        rule: &TypedRule<UnreferencedRule>,
        ctx: &ValidationContext<'_>,
        incoming: &HashMap<&str, usize>,
    ) -> Vec<Violation> {
        let ignore = compile_patterns(&rule.meta.name, &rule.body.ignore_patterns);
        ctx.symbols
            .iter()
            .filter(|s| rule.body.target.matches(&s.role))
            .filter(|s| !incoming.contains_key(s.path.as_str()))
            .filter(|s| !ignore.iter().any(|(_, re)| re.is_match(&s.path)))
            .map(|s| {
                let finding = if s.kind == SymbolKind::File {
                    format!("'{}' is never imported (possibly dead code)", s.path)
                } else {
                    format!(
                        "{} '{}' in '{}' is never imported (possibly dead code)",
                        s.kind, s.name, s.path
                    )
                };
                rule.meta.violation(&s.path, &finding).with_from_role(&s.role)
            })
            .collect()
    }
}

impl Validator for HygieneValidator {
    fn name(&self) -> &'static str {
        "hygiene"
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Vec<Violation> {
        let mut violations: Vec<Violation> = self
            .synonyms
            .iter()
            .flat_map(|rule| Self::check_synonyms(rule, ctx))
            .collect();

        if !self.unreferenced.is_empty() {
            let incoming = reference_counts(ctx);
            for rule in &self.unreferenced {
                violations.extend(Self::check_unreferenced(rule, ctx, &incoming));
            }
        }
        violations
    }
}

/// Incoming reference count per referenced path. A file importing itself
/// does not count.
fn reference_counts<'a>(ctx: &ValidationContext<'a>) -> HashMap<&'a str, usize> {
    let mut counts = HashMap::new();
    for symbol in ctx.symbols {
        for dep in &symbol.dependencies {
            if *dep != symbol.path {
                *counts.entry(dep.as_str()).or_insert(0) += 1;
            }
        }
    }
    counts
}

/// Reduces a file name to the part that carries meaning: no extension,
/// lowercase, and at most one trailing role-like suffix removed.
pub(crate) fn normalize_name(file_name: &str) -> String {
    let stem = match file_name.rsplit_once('.') {
        Some((stem, ext)) if SOURCE_EXTENSIONS.contains(&ext) => stem,
        _ => file_name,
    };
    let lower = stem.to_lowercase();

    for suffix in NOISE_SUFFIXES {
        let Some(rest) = lower.strip_suffix(suffix) else {
            continue;
        };
        let rest = SUFFIX_SEPARATORS
            .iter()
            .find_map(|sep| rest.strip_suffix(sep))
            .unwrap_or(rest);
        if !rest.is_empty() {
            return rest.to_string();
        }
    }
    lower
}

/// Ordered synonym groups compiled to word-boundary substitutions.
struct Thesaurus {
    substitutions: Vec<(Regex, String)>,
}

impl Thesaurus {
    fn new(rule: &str, groups: &[Vec<String>]) -> Self {
        let mut substitutions = Vec::new();
        for group in groups {
            let Some((canonical, others)) = group.split_first() else {
                continue;
            };
            let canonical = canonical.to_lowercase();
            for member in others {
                let pattern = format!(r"\b{}\b", regex::escape(&member.to_lowercase()));
                if let Some(re) = compile_pattern(rule, &pattern) {
                    substitutions.push((re, canonical.clone()));
                }
            }
        }
        Self { substitutions }
    }

    fn apply(&self, name: &str) -> String {
        self.substitutions
            .iter()
            .fold(name.to_string(), |acc, (re, canonical)| {
                re.replace_all(&acc, regex::NoExpand(canonical)).into_owned()
            })
    }
}
