//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const GRAMMAR_FILE: &str = "grammar.yaml";
const CONFIG_FILE: &str = "archgram.toml";

const DEFAULT_GRAMMAR: &str = r#"# archgram grammar
version: "1.0"
language: typescript

# Roles are matched against project-relative paths; first match wins.
roles:
  - name: DOMAIN
    path: "^src/domain/"
  - name: APPLICATION
    path: "^src/application/"
  - name: INFRA
    path: "^src/infra/"

rules:
  - name: domain-is-pure
    kind: forbidden
    comment: the domain must not know about adapters
    from: { role: DOMAIN }
    to: { role: [APPLICATION, INFRA] }

  - name: no-cycles
    kind: forbidden
    from: { role: ALL }
    to: { circular: true }

  - name: kebab-case-files
    severity: warning
    kind: naming_pattern
    for: { role: ALL }
    pattern: "/[a-z0-9.-]+\\.tsx?$"

  - name: small-files
    severity: warning
    kind: file_size
    for: { role: ALL }
    max_lines: 400

  - name: no-debug-leftovers
    severity: warning
    kind: forbidden_keywords
    from: { role: ALL }
    contains_forbidden: ["console.log", "debugger"]

  - name: similar-names
    severity: info
    kind: find_synonyms
    for: { role: ALL }
    options:
      similarity_threshold: 0.9
"#;

const DEFAULT_CONFIG: &str = r#"# archgram configuration

[analyzer]
# Project root (default: current directory)
# root = "."

# Grammar file relative to the root (default: grammar.yaml, grammar.yml,
# grammar.toml, grammar.json or .archgram/grammar.yaml)
grammar = "grammar.yaml"

# Excluded paths, gitignore syntax
exclude = ["node_modules/", "dist/"]

# Read every file once up front instead of per check
preload_content = true

# Worker threads (default: one per core)
# parallelism = 4

# Per-rule overrides, keyed by grammar rule name
# [rules.small-files]
# enabled = false
# severity = "error"
"#;

/// Runs the init command in the current directory.
pub fn run(force: bool) -> Result<()> {
    init_in(Path::new("."), force)?;

    println!("Created {GRAMMAR_FILE} and {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Edit {GRAMMAR_FILE} to describe your roles and rules");
    println!("  2. Run: archgram check");

    Ok(())
}

fn init_in(dir: &Path, force: bool) -> Result<()> {
    let targets = [
        (dir.join(GRAMMAR_FILE), DEFAULT_GRAMMAR),
        (dir.join(CONFIG_FILE), DEFAULT_CONFIG),
    ];

    if !force {
        if let Some((existing, _)) = targets.iter().find(|(path, _)| path.exists()) {
            bail!(
                "{} already exists. Use --force to overwrite.",
                existing.display()
            );
        }
    }

    for (path, content) in &targets {
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use archgram::grammar::{self, GrammarFormat};
    use archgram::Config;
    use tempfile::TempDir;

    #[test]
    fn templates_load() {
        let grammar = grammar::load_from_str(DEFAULT_GRAMMAR, GrammarFormat::Yaml).unwrap();
        assert_eq!(grammar.roles.len(), 3);
        assert_eq!(grammar.rules.len(), 6);

        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(
            config.analyzer.grammar.as_deref(),
            Some(Path::new("grammar.yaml"))
        );
    }

    #[test]
    fn writes_both_files() {
        let tmp = TempDir::new().unwrap();
        init_in(tmp.path(), false).unwrap();
        assert!(tmp.path().join(GRAMMAR_FILE).is_file());
        assert!(tmp.path().join(CONFIG_FILE).is_file());
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE), "# mine").unwrap();

        let err = init_in(tmp.path(), false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert!(!tmp.path().join(GRAMMAR_FILE).exists());

        init_in(tmp.path(), true).unwrap();
        let content = std::fs::read_to_string(tmp.path().join(CONFIG_FILE)).unwrap();
        assert!(content.contains("[analyzer]"));
    }
}
