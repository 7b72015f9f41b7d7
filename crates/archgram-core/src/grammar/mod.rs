//! Grammar loading: roles and rules describing the intended architecture.
//!
//! # Architecture
//!
//! ```text
//! YAML / TOML / JSON text
//!   ↓ serde (DTO layer)
//! config_dto types
//!   ↓ validate + convert
//! Grammar (pure domain model)
//! ```

use std::path::{Path, PathBuf};

pub mod config_dto;
pub mod loader;
pub mod model;

pub use loader::LoadError;
pub use model::{
    BarrelRule, ComplexityRule, DependencyTarget, DocumentationRule, FileSizeRule,
    ForbiddenDependency, Grammar, GranularityRule, KeywordRule, ModelError, NamingPattern,
    PatternRule, RoleDefinition, RoleEdge, RoleSelector, Rule, RuleKind, RuleMeta, StructureRule,
    SynonymRule, TestCoverageRule, TestRatioRule, UnreferencedRule,
};

/// File names tried for a grammar when none is configured, in order.
pub const GRAMMAR_CANDIDATES: &[&str] = &[
    "grammar.yaml",
    "grammar.yml",
    "grammar.toml",
    "grammar.json",
    ".archgram/grammar.yaml",
];

/// Serialization format of a grammar document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrammarFormat {
    /// `.yaml` / `.yml`
    Yaml,
    /// `.toml`
    Toml,
    /// `.json`
    Json,
}

impl GrammarFormat {
    /// Picks a format from a file extension, defaulting to YAML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::Toml,
            Some("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Errors from reading, parsing and validating a grammar.
#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    /// Failed to read the grammar file.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// IO error.
        source: std::io::Error,
    },

    /// YAML deserialization failed.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML deserialization failed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON deserialization failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Domain model validation failed.
    #[error("{0}")]
    Load(#[from] LoadError),

    /// No grammar file found in the project.
    #[error("no grammar file found in {0}")]
    NotFound(PathBuf),
}

/// Parses and validates a grammar document.
///
/// # Errors
///
/// Returns an error if deserialization or model validation fails.
pub fn load_from_str(content: &str, format: GrammarFormat) -> Result<Grammar, GrammarError> {
    let dto: config_dto::GrammarDto = match format {
        GrammarFormat::Yaml => serde_yaml::from_str(content)?,
        GrammarFormat::Toml => toml::from_str(content)?,
        GrammarFormat::Json => serde_json::from_str(content)?,
    };
    Ok(loader::load(dto)?)
}

/// Reads, parses and validates a grammar file. The format follows the
/// file extension.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is invalid.
pub fn load_from_path(path: &Path) -> Result<Grammar, GrammarError> {
    let content = std::fs::read_to_string(path).map_err(|e| GrammarError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!("Loading grammar from {}", path.display());
    load_from_str(&content, GrammarFormat::from_path(path))
}

/// Finds the grammar file inside a project directory.
///
/// # Errors
///
/// Returns [`GrammarError::NotFound`] if no candidate exists.
pub fn discover(project_dir: &Path) -> Result<PathBuf, GrammarError> {
    GRAMMAR_CANDIDATES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| GrammarError::NotFound(project_dir.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(GrammarFormat::from_path(Path::new("g.toml")), GrammarFormat::Toml);
        assert_eq!(GrammarFormat::from_path(Path::new("g.json")), GrammarFormat::Json);
        assert_eq!(GrammarFormat::from_path(Path::new("g.yml")), GrammarFormat::Yaml);
        assert_eq!(GrammarFormat::from_path(Path::new("grammar")), GrammarFormat::Yaml);
    }

    #[test]
    fn load_json_grammar() {
        let json = r#"{
            "version": "1.0",
            "language": "typescript",
            "roles": [{"name": "DOMAIN", "path": "^src/domain/"}],
            "rules": [{"name": "ratio", "kind": "minimum_test_ratio", "global": {"test_ratio": 0.5}}]
        }"#;
        let grammar = load_from_str(json, GrammarFormat::Json).unwrap();
        assert_eq!(grammar.roles.len(), 1);
        assert_eq!(grammar.rules[0].kind.discriminator(), "minimum_test_ratio");
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = load_from_str("roles: [", GrammarFormat::Yaml).unwrap_err();
        assert!(matches!(err, GrammarError::Yaml(_)));
    }

    #[test]
    fn discover_prefers_first_candidate() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(tmp.path().join("grammar.toml"), "").unwrap();
        std::fs::write(tmp.path().join("grammar.yaml"), "").unwrap();
        assert_eq!(discover(tmp.path()).unwrap(), tmp.path().join("grammar.yaml"));
    }

    #[test]
    fn discover_reports_missing_grammar() {
        let tmp = tempfile::TempDir::new().unwrap();
        assert!(matches!(discover(tmp.path()), Err(GrammarError::NotFound(_))));
    }
}
