//! Run configuration (`archgram.toml`).
//!
//! ```toml
//! [analyzer]
//! grammar = "arch/grammar.yaml"
//! exclude = ["node_modules/", "generated/"]
//! parallelism = 4
//!
//! [rules.no-cycles]
//! severity = "warning"
//!
//! [rules.legacy-names]
//! enabled = false
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::grammar::Rule;
use crate::types::Severity;

/// Top-level run configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// How and where to analyze.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Overrides keyed by grammar rule name.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates the built-in configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parses TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or has unexpected types.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Applies the override for `rule`, if any. Returns `None` when the
    /// rule is switched off.
    #[must_use]
    pub fn apply(&self, rule: &Rule) -> Option<Rule> {
        let Some(overrides) = self.rules.get(&rule.meta.name) else {
            return Some(rule.clone());
        };
        if overrides.enabled == Some(false) {
            return None;
        }
        let mut rule = rule.clone();
        if let Some(severity) = overrides.severity {
            rule.meta.severity = severity;
        }
        Some(rule)
    }
}

/// The `[analyzer]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Project root (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Grammar file, relative to the root. Discovered when absent.
    #[serde(default)]
    pub grammar: Option<PathBuf>,

    /// Paths kept out of parsing, gitignore syntax.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Read every symbol's file once before validation.
    #[serde(default = "default_true")]
    pub preload_content: bool,

    /// Worker threads; `None` uses rayon's global pool.
    #[serde(default)]
    pub parallelism: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            grammar: None,
            exclude: default_exclude(),
            preload_content: true,
            parallelism: None,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_exclude() -> Vec<String> {
    ["node_modules/", "dist/"].map(String::from).to_vec()
}

fn default_true() -> bool {
    true
}

/// A `[rules.<name>]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// `false` removes the rule from the run.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Replaces the severity declared in the grammar.
    #[serde(default)]
    pub severity: Option<Severity>,
}

/// Errors reading `archgram.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The TOML is malformed or has the wrong shape.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{FileSizeRule, RoleSelector, RuleKind, RuleMeta};

    fn rule(name: &str) -> Rule {
        Rule::new(
            RuleMeta::new(name, Severity::Error),
            RuleKind::FileSize(FileSizeRule {
                target: RoleSelector::All,
                max_lines: 10,
            }),
        )
    }

    #[test]
    fn default_config_preloads_content() {
        let config = Config::default();
        assert!(config.analyzer.preload_content);
        assert!(config.analyzer.grammar.is_none());
        assert_eq!(config.analyzer.exclude, ["node_modules/", "dist/"]);
        assert!(config.rules.is_empty());
    }

    #[test]
    fn parse_config() {
        let toml = r#"
[analyzer]
root = "./app"
grammar = "arch/grammar.yaml"
exclude = ["generated/"]
preload_content = false
parallelism = 4

[rules.no-cycles]
severity = "warning"

[rules.legacy-names]
enabled = false
"#;

        let config = Config::parse(toml).unwrap();
        assert_eq!(config.analyzer.root, PathBuf::from("./app"));
        assert_eq!(
            config.analyzer.grammar,
            Some(PathBuf::from("arch/grammar.yaml"))
        );
        assert_eq!(config.analyzer.exclude, ["generated/"]);
        assert!(!config.analyzer.preload_content);
        assert_eq!(config.analyzer.parallelism, Some(4));

        let downgraded = config.apply(&rule("no-cycles")).unwrap();
        assert_eq!(downgraded.meta.severity, Severity::Warning);
        assert!(config.apply(&rule("legacy-names")).is_none());
        assert_eq!(
            config.apply(&rule("not-mentioned")).unwrap().meta.severity,
            Severity::Error
        );
    }

    #[test]
    fn analyzer_table_alone_keeps_default_excludes() {
        let config = Config::parse("[analyzer]\nparallelism = 2\n").unwrap();
        assert_eq!(config.analyzer.exclude, ["node_modules/", "dist/"]);
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        assert!(matches!(
            Config::parse("[analyzer"),
            Err(ConfigError::Parse(_))
        ));
    }
}
