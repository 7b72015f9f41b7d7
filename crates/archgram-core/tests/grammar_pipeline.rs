//! Integration test: grammar file → roles → rule buckets.
//!
//! Writes a grammar into a temporary project and checks that loading,
//! role assignment and extraction agree with each other.

use archgram_core::grammar::{self, GrammarError, LoadError};
use archgram_core::{RoleAssigner, RuleSet, Severity, Symbol, SymbolKind, UNKNOWN_ROLE};
use tempfile::TempDir;

const GRAMMAR: &str = r#"
version: "1.0"
language: typescript
roles:
  - { name: CONTROLLER, path: "\\.controller\\.ts$" }
  - { name: DOMAIN, path: "^src/domain/" }
  - { name: INFRA, path: "^src/infra/" }
rules:
  - name: domain-no-infra
    kind: forbidden
    comment: the domain stays framework free
    from: { role: DOMAIN }
    to: { role: INFRA }
  - name: no-cycles
    severity: warning
    kind: forbidden
    from: { role: ALL }
    to: { circular: true }
  - name: some-future-rule
    kind: enforce_vibes
  - name: small-files
    severity: info
    kind: file_size
    for: { role: [DOMAIN, INFRA] }
    max_lines: 300
"#;

fn project_with_grammar(name: &str, content: &str) -> TempDir {
    let tmp = TempDir::new().expect("temp dir");
    std::fs::write(tmp.path().join(name), content).expect("write grammar");
    tmp
}

#[test]
fn discovered_grammar_drives_roles_and_buckets() {
    let project = project_with_grammar("grammar.yaml", GRAMMAR);
    let path = grammar::discover(project.path()).expect("grammar should be found");
    let grammar = grammar::load_from_path(&path).expect("grammar should load");

    // The unknown kind is dropped at load time.
    assert_eq!(grammar.rules.len(), 3);

    let symbols = RoleAssigner::new(&grammar.roles).assign(vec![
        Symbol::new("src/domain/user.controller.ts", "UserController", SymbolKind::Class),
        Symbol::new("src/domain/user.ts", "User", SymbolKind::Class),
        Symbol::new("src/infra/db.ts", "Db", SymbolKind::Class),
        Symbol::new("scripts/seed.ts", "seed", SymbolKind::File),
    ]);
    let roles: Vec<&str> = symbols.iter().map(|s| s.role.as_str()).collect();
    assert_eq!(roles, vec!["CONTROLLER", "DOMAIN", "INFRA", UNKNOWN_ROLE]);

    let rules = RuleSet::from_rules(&grammar.rules);
    assert_eq!(rules.forbidden.len(), 1);
    assert_eq!(rules.circular.len(), 1);
    assert_eq!(rules.file_size.len(), 1);
    assert!(rules.has_dependency());
    assert!(rules.has_file_metrics());
    assert!(!rules.has_hygiene());

    let layer = &rules.forbidden[0].meta;
    assert_eq!(
        layer.message("DOMAIN cannot depend on INFRA"),
        "[domain-no-infra] DOMAIN cannot depend on INFRA (the domain stays framework free)"
    );
    assert_eq!(rules.circular[0].meta.severity, Severity::Warning);
}

#[test]
fn toml_grammar_loads_like_yaml() {
    let project = project_with_grammar(
        "grammar.toml",
        r#"
[[roles]]
name = "SERVICE"
path = "service\\.ts$"

[[rules]]
name = "services-need-repos"
kind = "required"
from = { role = "SERVICE" }
to = { role = ["REPOSITORY", "GATEWAY"] }
"#,
    );
    let grammar = grammar::load_from_path(&project.path().join("grammar.toml")).unwrap();
    let rules = RuleSet::from_rules(&grammar.rules);
    assert_eq!(rules.required.len(), 1);
    assert_eq!(rules.required[0].body.to.to_string(), "REPOSITORY or GATEWAY");
}

#[test]
fn invalid_naming_pattern_fails_with_context() {
    let project = project_with_grammar(
        "grammar.yaml",
        r#"
rules:
  - name: services
    kind: naming_pattern
    for: { role: SERVICE }
    pattern: "([a-z]+"
"#,
    );
    let err = grammar::load_from_path(&project.path().join("grammar.yaml")).unwrap_err();
    assert!(matches!(
        err,
        GrammarError::Load(LoadError::Validation { .. })
    ));
    assert!(err.to_string().contains("rules[0] 'services'.pattern"));
}

#[test]
fn missing_grammar_file_is_an_io_error() {
    let tmp = TempDir::new().unwrap();
    let err = grammar::load_from_path(&tmp.path().join("grammar.yaml")).unwrap_err();
    assert!(matches!(err, GrammarError::Io { .. }));
}
