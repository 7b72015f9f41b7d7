//! Pure domain model for grammars.
//!
//! This module contains no serde and no I/O. Role patterns are compiled once
//! at construction; rule-supplied scan patterns stay raw strings because an
//! invalid scan pattern is skipped at check time rather than rejected here.

use crate::types::{Severity, Violation};
use regex::Regex;
use std::fmt;

// ────────────────────────────────────────────
// Roles
// ────────────────────────────────────────────

/// A named role: every symbol whose path matches `pattern` takes this name,
/// unless an earlier role already matched.
#[derive(Debug, Clone)]
pub struct RoleDefinition {
    name: String,
    pattern: Regex,
}

impl RoleDefinition {
    /// Creates a role definition, compiling its path pattern.
    ///
    /// # Errors
    ///
    /// Returns error if the name is empty or the pattern is not a valid regex.
    pub fn new(name: &str, path_pattern: &str) -> Result<Self, ModelError> {
        if name.is_empty() {
            return Err(ModelError::EmptyRoleName);
        }
        let pattern = Regex::new(path_pattern).map_err(|e| ModelError::InvalidPattern {
            pattern: path_pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            name: name.to_string(),
            pattern,
        })
    }

    /// Returns the role name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the raw path pattern.
    #[must_use]
    pub fn path_pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Tests whether a symbol path belongs to this role.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.pattern.is_match(path)
    }
}

/// Selects symbols by role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleSelector {
    /// The `"ALL"` sentinel: every role, including `UNKNOWN`.
    All,
    /// Exactly this role.
    One(String),
    /// Any of these roles.
    Any(Vec<String>),
}

impl RoleSelector {
    /// Sentinel string that selects every role.
    pub const ALL: &'static str = "ALL";

    /// Builds a selector from a single role string.
    #[must_use]
    pub fn one(role: &str) -> Self {
        if role == Self::ALL {
            Self::All
        } else {
            Self::One(role.to_string())
        }
    }

    /// Builds a selector from a role list.
    #[must_use]
    pub fn any<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Any(roles.into_iter().map(Into::into).collect())
    }

    /// Does `role` satisfy this selector? Case-sensitive, no globbing.
    #[must_use]
    pub fn matches(&self, role: &str) -> bool {
        match self {
            Self::All => true,
            Self::One(expected) => expected == role,
            Self::Any(roles) => roles.iter().any(|r| r == role),
        }
    }
}

impl fmt::Display for RoleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(Self::ALL),
            Self::One(role) => f.write_str(role),
            Self::Any(roles) => f.write_str(&roles.join(" or ")),
        }
    }
}

/// Target of a `forbidden` dependency rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyTarget {
    /// Edges into these roles are forbidden.
    Role(RoleSelector),
    /// Cycles among the `from` roles are forbidden.
    Circular,
}

// ────────────────────────────────────────────
// Rule bodies
// ────────────────────────────────────────────

/// `naming_pattern`: paths of selected symbols must match `pattern`.
#[derive(Debug, Clone, PartialEq)]
pub struct NamingPattern {
    /// Selected roles.
    pub target: RoleSelector,
    /// Regex every selected path must match.
    pub pattern: String,
}

/// `forbidden`: edges or cycles that must not exist.
#[derive(Debug, Clone, PartialEq)]
pub struct ForbiddenDependency {
    /// Source roles.
    pub from: RoleSelector,
    /// Forbidden target roles, or the circular sentinel.
    pub to: DependencyTarget,
}

/// A role-to-role edge rule (`required`, `allowed`, and role-targeted `forbidden`).
#[derive(Debug, Clone, PartialEq)]
pub struct RoleEdge {
    /// Source roles.
    pub from: RoleSelector,
    /// Target roles.
    pub to: RoleSelector,
}

/// `find_synonyms`: near-duplicate file names within the selected roles.
#[derive(Debug, Clone, PartialEq)]
pub struct SynonymRule {
    /// Selected roles.
    pub target: RoleSelector,
    /// Jaro-Winkler score at or above which two names are reported.
    pub similarity_threshold: f64,
    /// Ordered synonym groups; the first member of each is canonical.
    pub thesaurus: Vec<Vec<String>>,
}

/// `detect_unreferenced`: selected symbols nobody depends on.
#[derive(Debug, Clone, PartialEq)]
pub struct UnreferencedRule {
    /// Selected roles.
    pub target: RoleSelector,
    /// Path regexes exempt from the check.
    pub ignore_patterns: Vec<String>,
}

/// `file_size`: maximum line count.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSizeRule {
    /// Selected roles.
    pub target: RoleSelector,
    /// Largest allowed line count.
    pub max_lines: usize,
}

/// `test_coverage`: every selected file needs a sibling test file.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCoverageRule {
    /// Selected roles.
    pub from: RoleSelector,
}

/// `forbidden_keywords`: plain substrings that must not appear.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordRule {
    /// Selected roles.
    pub from: RoleSelector,
    /// Ordered substrings.
    pub keywords: Vec<String>,
}

/// `required_structure`: directories that must exist.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureRule {
    /// Project-relative directories.
    pub directories: Vec<String>,
}

/// `documentation_required`: long files need a block doc comment.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentationRule {
    /// Selected roles.
    pub target: RoleSelector,
    /// Files shorter than this are exempt.
    pub min_lines: usize,
    /// Whether a `/**` comment is required.
    pub requires_jsdoc: bool,
}

/// `class_complexity`: heuristic member counts.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexityRule {
    /// Selected roles.
    pub target: RoleSelector,
    /// Largest allowed public-method count.
    pub max_public_methods: usize,
    /// Largest allowed property count.
    pub max_properties: usize,
}

/// `minimum_test_ratio`: project-wide test files per production file.
#[derive(Debug, Clone, PartialEq)]
pub struct TestRatioRule {
    /// Lowest allowed `tests / production` ratio.
    pub test_ratio: f64,
}

/// `granularity_metric`: average file length.
#[derive(Debug, Clone, PartialEq)]
pub struct GranularityRule {
    /// Selected roles.
    pub target: RoleSelector,
    /// Intended average lines per file.
    pub target_loc_per_file: f64,
    /// Tolerance factor applied to the target.
    pub warning_threshold_multiplier: f64,
}

/// `forbidden_patterns`: regexes that must not match file content.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternRule {
    /// Selected roles.
    pub from: RoleSelector,
    /// Ordered regexes; invalid entries are skipped.
    pub patterns: Vec<String>,
}

/// `barrel_purity`: barrel files should only re-export.
#[derive(Debug, Clone, PartialEq)]
pub struct BarrelRule {
    /// Regex selecting barrel files by path.
    pub file_pattern: String,
    /// Ordered regexes; invalid entries are skipped.
    pub patterns: Vec<String>,
}

/// Kind-specific part of a rule.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleKind {
    /// `naming_pattern`
    NamingPattern(NamingPattern),
    /// `forbidden`
    Forbidden(ForbiddenDependency),
    /// `required`
    Required(RoleEdge),
    /// `allowed`
    Allowed(RoleEdge),
    /// `find_synonyms`
    FindSynonyms(SynonymRule),
    /// `detect_unreferenced`
    DetectUnreferenced(UnreferencedRule),
    /// `file_size`
    FileSize(FileSizeRule),
    /// `test_coverage`
    TestCoverage(TestCoverageRule),
    /// `forbidden_keywords`
    ForbiddenKeywords(KeywordRule),
    /// `required_structure`
    RequiredStructure(StructureRule),
    /// `documentation_required`
    DocumentationRequired(DocumentationRule),
    /// `class_complexity`
    ClassComplexity(ComplexityRule),
    /// `minimum_test_ratio`
    MinimumTestRatio(TestRatioRule),
    /// `granularity_metric`
    GranularityMetric(GranularityRule),
    /// `forbidden_patterns`
    ForbiddenPatterns(PatternRule),
    /// `barrel_purity`
    BarrelPurity(BarrelRule),
}

impl RuleKind {
    /// Every discriminator a grammar may use, in declaration order.
    pub const DISCRIMINATORS: &'static [&'static str] = &[
        "naming_pattern",
        "forbidden",
        "required",
        "allowed",
        "find_synonyms",
        "detect_unreferenced",
        "file_size",
        "test_coverage",
        "forbidden_keywords",
        "required_structure",
        "documentation_required",
        "class_complexity",
        "minimum_test_ratio",
        "granularity_metric",
        "forbidden_patterns",
        "barrel_purity",
    ];

    /// Returns the grammar discriminator for this kind.
    #[must_use]
    pub fn discriminator(&self) -> &'static str {
        match self {
            Self::NamingPattern(_) => "naming_pattern",
            Self::Forbidden(_) => "forbidden",
            Self::Required(_) => "required",
            Self::Allowed(_) => "allowed",
            Self::FindSynonyms(_) => "find_synonyms",
            Self::DetectUnreferenced(_) => "detect_unreferenced",
            Self::FileSize(_) => "file_size",
            Self::TestCoverage(_) => "test_coverage",
            Self::ForbiddenKeywords(_) => "forbidden_keywords",
            Self::RequiredStructure(_) => "required_structure",
            Self::DocumentationRequired(_) => "documentation_required",
            Self::ClassComplexity(_) => "class_complexity",
            Self::MinimumTestRatio(_) => "minimum_test_ratio",
            Self::GranularityMetric(_) => "granularity_metric",
            Self::ForbiddenPatterns(_) => "forbidden_patterns",
            Self::BarrelPurity(_) => "barrel_purity",
        }
    }
}

// ────────────────────────────────────────────
// Rules
// ────────────────────────────────────────────

/// Fields every rule carries regardless of kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMeta {
    /// Rule name, unique within a grammar by convention.
    pub name: String,
    /// Severity of the violations this rule emits.
    pub severity: Severity,
    /// Optional human explanation appended to every message.
    pub comment: Option<String>,
}

impl RuleMeta {
    /// Creates rule metadata without a comment.
    #[must_use]
    pub fn new(name: impl Into<String>, severity: Severity) -> Self {
        Self {
            name: name.into(),
            severity,
            comment: None,
        }
    }

    /// Sets the comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Formats a finding as `[name] finding`, plus ` (comment)` when present.
    #[must_use]
    pub fn message(&self, finding: &str) -> String {
        match &self.comment {
            Some(comment) => format!("[{}] {finding} ({comment})", self.name),
            None => format!("[{}] {finding}", self.name),
        }
    }

    /// Builds a violation attributed to `file`.
    #[must_use]
    pub fn violation(&self, file: impl Into<String>, finding: &str) -> Violation {
        Violation::new(&self.name, self.severity, file, self.message(finding))
    }
}

/// One grammar rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Name, severity and comment.
    pub meta: RuleMeta,
    /// Kind-specific body.
    pub kind: RuleKind,
}

impl Rule {
    /// Creates a rule.
    #[must_use]
    pub fn new(meta: RuleMeta, kind: RuleKind) -> Self {
        Self { meta, kind }
    }

    /// Returns the rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.meta.name
    }
}

// ────────────────────────────────────────────
// Aggregate root
// ────────────────────────────────────────────

/// A loaded grammar: ordered roles and ordered rules.
#[derive(Debug, Clone)]
pub struct Grammar {
    /// Grammar format version.
    pub version: String,
    /// Source language the grammar targets.
    pub language: String,
    /// Ordered role definitions; first match wins.
    pub roles: Vec<RoleDefinition>,
    /// Ordered rules.
    pub rules: Vec<Rule>,
}

impl Grammar {
    /// Creates a grammar.
    #[must_use]
    pub fn new(
        version: impl Into<String>,
        language: impl Into<String>,
        roles: Vec<RoleDefinition>,
        rules: Vec<Rule>,
    ) -> Self {
        Self {
            version: version.into(),
            language: language.into(),
            roles,
            rules,
        }
    }

    /// Returns true if the grammar defines no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

// ────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────

/// Errors in domain model construction.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelError {
    /// Role name is empty.
    #[error("role name must not be empty")]
    EmptyRoleName,

    /// A pattern is not a valid regular expression.
    #[error("invalid pattern `{pattern}`: {reason}")]
    InvalidPattern {
        /// The invalid pattern.
        pattern: String,
        /// Why it's invalid.
        reason: String,
    },
}

// ────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────
