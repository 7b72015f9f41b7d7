//! Grammar deserialization types (DTO layer).
//!
//! These types exist solely for serde deserialization from YAML, TOML or
//! JSON. They are converted to domain model types via the loader.

use serde::Deserialize;

/// Raw representation of a grammar document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GrammarDto {
    /// Grammar format version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Target language.
    #[serde(default = "default_language")]
    pub language: String,
    /// Ordered role definitions.
    #[serde(default)]
    pub roles: Vec<RoleDto>,
    /// Ordered rules.
    #[serde(default)]
    pub rules: Vec<RuleDto>,
}

/// A role definition.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleDto {
    /// Role name (e.g., `"DOMAIN"`).
    pub name: String,
    /// Regex tested against symbol paths.
    pub path: String,
}

/// A role selector: a single role (possibly `"ALL"`) or a list of roles.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RoleSelectorDto {
    /// `role: DOMAIN`
    One(String),
    /// `role: [SERVICE, REPOSITORY]`
    Many(Vec<String>),
}

/// The `for` block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForDto {
    /// Role selector.
    #[serde(default)]
    pub role: Option<RoleSelectorDto>,
    /// File path regex (used by `barrel_purity`).
    #[serde(default)]
    pub file_pattern: Option<String>,
}

/// The `from` block.
#[derive(Debug, Clone, Deserialize)]
pub struct FromDto {
    /// Role selector.
    pub role: RoleSelectorDto,
}

/// The `to` block: a role selector or the circular sentinel.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToDto {
    /// Role selector.
    #[serde(default)]
    pub role: Option<RoleSelectorDto>,
    /// `circular: true` turns a `forbidden` rule into a cycle check.
    #[serde(default)]
    pub circular: bool,
}

/// The `options` block (hygiene rules).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionsDto {
    /// Synonym similarity threshold in `0..=1`.
    #[serde(default)]
    pub similarity_threshold: Option<f64>,
    /// Ordered synonym groups.
    #[serde(default)]
    pub thesaurus: Vec<Vec<String>>,
    /// Path regexes exempt from unreferenced detection.
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

/// The `global` block (`minimum_test_ratio`).
#[derive(Debug, Clone, Deserialize)]
pub struct GlobalDto {
    /// Lowest allowed test/production ratio.
    pub test_ratio: f64,
}

/// A rule of any kind. Kind-specific fields are optional here and checked
/// by the loader.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleDto {
    /// Rule name.
    pub name: String,
    /// Severity (default: "error").
    #[serde(default = "default_severity_str")]
    pub severity: String,
    /// Optional explanation appended to messages.
    #[serde(default)]
    pub comment: Option<String>,
    /// Discriminator (e.g., `"forbidden"`).
    pub kind: String,
    /// Target selector.
    #[serde(rename = "for", default)]
    pub target: Option<ForDto>,
    /// Source selector.
    #[serde(default)]
    pub from: Option<FromDto>,
    /// Dependency target.
    #[serde(default)]
    pub to: Option<ToDto>,
    /// Naming regex.
    #[serde(default)]
    pub pattern: Option<String>,
    /// Hygiene options.
    #[serde(default)]
    pub options: Option<OptionsDto>,
    /// `file_size` limit.
    #[serde(default)]
    pub max_lines: Option<usize>,
    /// `documentation_required` minimum length.
    #[serde(default)]
    pub min_lines: Option<usize>,
    /// `documentation_required` switch.
    #[serde(default)]
    pub requires_jsdoc: Option<bool>,
    /// `class_complexity` method limit.
    #[serde(default)]
    pub max_public_methods: Option<usize>,
    /// `class_complexity` property limit.
    #[serde(default)]
    pub max_properties: Option<usize>,
    /// `minimum_test_ratio` settings.
    #[serde(default)]
    pub global: Option<GlobalDto>,
    /// `granularity_metric` target.
    #[serde(default)]
    pub target_loc_per_file: Option<f64>,
    /// `granularity_metric` tolerance.
    #[serde(default)]
    pub warning_threshold_multiplier: Option<f64>,
    /// Keywords or regexes for content scans.
    #[serde(default)]
    pub contains_forbidden: Option<Vec<String>>,
    /// `required_structure` directories.
    #[serde(default)]
    pub directories: Option<Vec<String>>,
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_language() -> String {
    "typescript".to_string()
}

fn default_severity_str() -> String {
    "error".to_string()
}
