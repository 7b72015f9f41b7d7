//! Helpers shared by several validators.

use std::collections::HashSet;

use archgram_core::{RoleSelector, Symbol};
use regex::Regex;
use tracing::debug;

/// Returns the first symbol of each distinct path whose role matches
/// `selector`, in symbol order.
///
/// Content checks run once per file even when a file exports many symbols.
pub(crate) fn files_with_role<'a>(symbols: &'a [Symbol], selector: &RoleSelector) -> Vec<&'a Symbol> {
    distinct_files(symbols.iter().filter(|s| selector.matches(&s.role)))
}

/// Returns the first symbol of each distinct path, in order.
pub(crate) fn distinct_files<'a, I>(symbols: I) -> Vec<&'a Symbol>
where
    I: IntoIterator<Item = &'a Symbol>,
{
    let mut seen = HashSet::new();
    symbols
        .into_iter()
        .filter(|&s| seen.insert(s.path.as_str()))
        .collect()
}

/// Compiles rule-supplied patterns in order, skipping the ones that fail.
pub(crate) fn compile_patterns(rule: &str, patterns: &[String]) -> Vec<(String, Regex)> {
    patterns
        .iter()
        .filter_map(|p| compile_pattern(rule, p).map(|re| (p.clone(), re)))
        .collect()
}

/// Compiles one rule-supplied pattern, logging and returning `None` on error.
pub(crate) fn compile_pattern(rule: &str, pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            debug!("[{rule}] skipping invalid pattern `{pattern}`: {e}");
            None
        }
    }
}

/// Line count as newline count plus one.
pub(crate) fn line_count(content: &str) -> usize {
    content.bytes().filter(|&b| b == b'\n').count() + 1
}

/// Path markers of test files.
const TEST_MARKERS: &[&str] = &[".test.", ".spec.", "__tests__/"];

/// Directory names that hold tests.
const TEST_ROOTS: &[&str] = &["test", "tests"];

/// Whether a project-relative path is a test file.
pub(crate) fn is_test_path(path: &str) -> bool {
    if TEST_MARKERS.iter().any(|m| path.contains(m)) {
        return true;
    }
    // Any directory component, not the file name itself.
    let mut segments: Vec<&str> = path.split('/').collect();
    segments.pop();
    segments.iter().any(|s| TEST_ROOTS.contains(s))
}
