//! List rules command implementation.

use archgram::grammar::RuleKind;

/// `(kind, validator, description)` for every supported rule kind.
const RULE_KINDS: &[(&str, &str, &str)] = &[
    ("naming_pattern", "naming", "paths of a role must match a regex"),
    ("forbidden", "dependency", "role A must not import role B (or `to: { circular: true }`)"),
    ("required", "dependency", "role A must import at least one file of role B"),
    ("allowed", "dependency", "documents a permitted A -> B edge; never reported"),
    ("find_synonyms", "hygiene", "flags near-identical file names (Jaro-Winkler)"),
    ("detect_unreferenced", "hygiene", "flags symbols nothing imports"),
    ("file_size", "file-metrics", "caps the line count of a file"),
    ("test_coverage", "file-metrics", "requires a sibling or parallel test file"),
    ("documentation_required", "file-metrics", "long files need a /** doc comment"),
    ("class_complexity", "file-metrics", "caps public methods and properties"),
    ("granularity_metric", "file-metrics", "caps the average file length"),
    ("forbidden_keywords", "code-pattern", "bans literal substrings in file content"),
    ("forbidden_patterns", "code-pattern", "bans regex matches in file content"),
    ("barrel_purity", "code-pattern", "barrel files may only re-export"),
    ("required_structure", "structure", "directories that must exist"),
    ("minimum_test_ratio", "structure", "minimum test/production file ratio"),
];

/// Runs the list-rules command.
pub fn run() {
    println!("Supported rule kinds:\n");
    println!("{:<24} {:<14} Description", "Kind", "Validator");
    println!("{}", "-".repeat(80));

    for kind in RuleKind::DISCRIMINATORS {
        let (validator, description) = RULE_KINDS
            .iter()
            .find(|(k, _, _)| k == kind)
            .map_or(("", ""), |(_, v, d)| (*v, *d));
        println!("{kind:<24} {validator:<14} {description}");
    }

    println!("\nRoles are matched with `role: NAME`, `role: [A, B]` or `role: ALL`.");
    println!("Run `archgram init` to write a starter grammar.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_is_described() {
        for kind in RuleKind::DISCRIMINATORS {
            assert!(
                RULE_KINDS.iter().any(|(k, _, _)| k == kind),
                "missing description for {kind}"
            );
        }
        assert_eq!(RULE_KINDS.len(), RuleKind::DISCRIMINATORS.len());
    }
}
