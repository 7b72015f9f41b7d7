//! Collapses exact duplicate violations.

use std::collections::HashSet;

use crate::types::Violation;

const KEY_SEPARATOR: char = '\u{1f}';

/// Drops every violation whose (file, rule name, message) was already seen,
/// keeping the first occurrence and the original order.
///
/// Other fields do not take part in the key, so a later duplicate with a
/// different `from_role` is still dropped.
#[must_use]
pub fn dedup(violations: Vec<Violation>) -> Vec<Violation> {
    let mut seen = HashSet::with_capacity(violations.len());
    violations
        .into_iter()
        .filter(|v| seen.insert(key(v)))
        .collect()
}

fn key(v: &Violation) -> String {
    format!(
        "{}{KEY_SEPARATOR}{}{KEY_SEPARATOR}{}",
        v.file, v.rule_name, v.message
    )
}
