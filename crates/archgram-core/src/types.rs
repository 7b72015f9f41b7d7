//! Violations, severities and the result of a run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// File attribution used by rules that judge the whole codebase.
pub const PROJECT_FILE: &str = "PROJECT";

/// How serious a violation is. Ordered `Info < Warning < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Reported, never fails a run.
    Info,
    /// Reported, never fails a run.
    Warning,
    /// Fails the run.
    Error,
}

impl Severity {
    /// Lowercase name as written in grammars.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    /// The rejected input.
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Error, Self::Warning, Self::Info]
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// A single departure from the grammar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Grammar rule that produced it.
    pub rule_name: String,
    /// Copied from the rule.
    pub severity: Severity,
    /// Project-relative file path, or [`PROJECT_FILE`].
    pub file: String,
    /// Self-describing message, `[rule] finding (comment)`.
    pub message: String,
    /// Role of the depending symbol.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_role: Option<String>,
    /// Role of the dependency target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_role: Option<String>,
    /// Offending dependency path or a cycle description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency: Option<String>,
}

impl Violation {
    /// Creates a violation without edge details.
    #[must_use]
    pub fn new(
        rule_name: impl Into<String>,
        severity: Severity,
        file: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_name: rule_name.into(),
            severity,
            file: file.into(),
            message: message.into(),
            from_role: None,
            to_role: None,
            dependency: None,
        }
    }

    /// Attaches the source and target roles of a dependency edge.
    #[must_use]
    pub fn with_roles(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.from_role = Some(from.into());
        self.to_role = Some(to.into());
        self
    }

    /// Attaches the source role only.
    #[must_use]
    pub fn with_from_role(mut self, from: impl Into<String>) -> Self {
        self.from_role = Some(from.into());
        self
    }

    /// Attaches the offending dependency (a path or a cycle description).
    #[must_use]
    pub fn with_dependency(mut self, dependency: impl Into<String>) -> Self {
        self.dependency = Some(dependency.into());
        self
    }
}

/// One line: `file: severity message`.
impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {}", self.file, self.severity, self.message)
    }
}

/// Outcome of one analysis run.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// Deduplicated violations in validator registration order.
    pub violations: Vec<Violation>,
    /// Distinct files the parser produced symbols for.
    pub files_checked: usize,
    /// Symbols analyzed.
    pub symbols_checked: usize,
}

impl LintResult {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any violation has [`Severity::Error`].
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity == Severity::Error)
    }

    /// Violations at exactly `severity`.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .collect()
    }

    /// `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        self.violations
            .iter()
            .fold((0, 0, 0), |(e, w, i), v| match v.severity {
                Severity::Error => (e + 1, w, i),
                Severity::Warning => (e, w + 1, i),
                Severity::Info => (e, w, i + 1),
            })
    }
}
