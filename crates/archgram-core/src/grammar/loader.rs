//! DTO → Domain model conversion with validation.

use regex::Regex;
use tracing::warn;

use crate::types::Severity;

use super::config_dto::{GrammarDto, RoleDto, RoleSelectorDto, RuleDto};
use super::model::{
    BarrelRule, ComplexityRule, DependencyTarget, DocumentationRule, FileSizeRule,
    ForbiddenDependency, Grammar, GranularityRule, KeywordRule, ModelError, NamingPattern,
    PatternRule, RoleDefinition, RoleEdge, RoleSelector, Rule, RuleKind, RuleMeta, StructureRule,
    SynonymRule, TestCoverageRule, TestRatioRule, UnreferencedRule,
};

const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.85;

/// Errors during DTO → Domain conversion.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A field-level validation error.
    #[error("{context}: {source}")]
    Validation {
        /// Where the error occurred (e.g., "roles[0].path").
        context: String,
        /// The underlying model error.
        source: ModelError,
    },

    /// A field required by the rule kind is missing.
    #[error("{context}: `{kind}` rules require `{field}`")]
    MissingField {
        /// Where the error occurred.
        context: String,
        /// Rule discriminator.
        kind: String,
        /// Dotted field path.
        field: &'static str,
    },

    /// A numeric field is out of range.
    #[error("{context}: `{field}` = {value} is out of range ({expected})")]
    OutOfRange {
        /// Where the error occurred.
        context: String,
        /// Dotted field path.
        field: &'static str,
        /// The offending value.
        value: f64,
        /// Human description of the accepted range.
        expected: &'static str,
    },

    /// Unknown severity string.
    #[error("{context}: unknown severity `{value}`, expected: error, warning, info")]
    UnknownSeverity {
        /// Where the error occurred.
        context: String,
        /// The invalid value.
        value: String,
    },
}

/// Converts a `GrammarDto` to a validated `Grammar`.
///
/// Rules with an unrecognized `kind` are dropped with a warning and never
/// reach any validator.
///
/// # Errors
///
/// Returns the first error encountered during conversion.
pub fn load(dto: GrammarDto) -> Result<Grammar, LoadError> {
    let roles = dto
        .roles
        .iter()
        .enumerate()
        .map(|(i, r)| convert_role(r, i))
        .collect::<Result<Vec<_>, _>>()?;

    let mut rules = Vec::with_capacity(dto.rules.len());
    for (i, rule) in dto.rules.into_iter().enumerate() {
        if let Some(rule) = convert_rule(rule, i)? {
            rules.push(rule);
        }
    }

    Ok(Grammar::new(dto.version, dto.language, roles, rules))
}

fn convert_role(dto: &RoleDto, index: usize) -> Result<RoleDefinition, LoadError> {
    RoleDefinition::new(&dto.name, &dto.path).map_err(|e| LoadError::Validation {
        context: format!("roles[{index}]"),
        source: e,
    })
}

fn convert_selector(dto: RoleSelectorDto) -> RoleSelector {
    match dto {
        RoleSelectorDto::One(role) => RoleSelector::one(&role),
        RoleSelectorDto::Many(roles) => RoleSelector::Any(roles),
    }
}

/// Kind-specific field access with uniform missing-field errors.
struct Fields<'a> {
    context: String,
    kind: &'a str,
}

impl Fields<'_> {
    fn require<T>(&self, value: Option<T>, field: &'static str) -> Result<T, LoadError> {
        value.ok_or_else(|| LoadError::MissingField {
            context: self.context.clone(),
            kind: self.kind.to_string(),
            field,
        })
    }

    fn check_regex(&self, pattern: &str, field: &'static str) -> Result<(), LoadError> {
        Regex::new(pattern)
            .map(|_| ())
            .map_err(|e| LoadError::Validation {
                context: format!("{}.{field}", self.context),
                source: ModelError::InvalidPattern {
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                },
            })
    }

    fn check_range(
        &self,
        value: f64,
        field: &'static str,
        valid: bool,
        expected: &'static str,
    ) -> Result<(), LoadError> {
        if valid {
            Ok(())
        } else {
            Err(LoadError::OutOfRange {
                context: self.context.clone(),
                field,
                value,
                expected,
            })
        }
    }
}

#[allow(clippy::too_many_lines)]
fn convert_rule(dto: RuleDto, index: usize) -> Result<Option<Rule>, LoadError> {
    let context = format!("rules[{index}] '{}'", dto.name);
    let kind_str = dto.kind.clone();
    let f = Fields {
        context: context.clone(),
        kind: &kind_str,
    };

    let target_role = dto
        .target
        .as_ref()
        .and_then(|t| t.role.clone())
        .map(convert_selector);
    let from_role = dto.from.map(|f| convert_selector(f.role));
    let to = dto.to;
    let options = dto.options.unwrap_or_default();

    let kind = match kind_str.as_str() {
        "naming_pattern" => {
            let pattern = f.require(dto.pattern, "pattern")?;
            f.check_regex(&pattern, "pattern")?;
            RuleKind::NamingPattern(NamingPattern {
                target: f.require(target_role, "for.role")?,
                pattern,
            })
        }
        "forbidden" => {
            let to = f.require(to, "to")?;
            let to = if to.circular {
                DependencyTarget::Circular
            } else {
                DependencyTarget::Role(convert_selector(f.require(to.role, "to.role")?))
            };
            RuleKind::Forbidden(ForbiddenDependency {
                from: f.require(from_role, "from.role")?,
                to,
            })
        }
        "required" | "allowed" => {
            let edge = RoleEdge {
                from: f.require(from_role, "from.role")?,
                to: convert_selector(f.require(to.and_then(|t| t.role), "to.role")?),
            };
            if kind_str == "required" {
                RuleKind::Required(edge)
            } else {
                RuleKind::Allowed(edge)
            }
        }
        "find_synonyms" => {
            let threshold = options
                .similarity_threshold
                .unwrap_or(DEFAULT_SIMILARITY_THRESHOLD);
            f.check_range(
                threshold,
                "options.similarity_threshold",
                (0.0..=1.0).contains(&threshold),
                "0 to 1",
            )?;
            RuleKind::FindSynonyms(SynonymRule {
                target: f.require(target_role, "for.role")?,
                similarity_threshold: threshold,
                thesaurus: options.thesaurus,
            })
        }
        "detect_unreferenced" => RuleKind::DetectUnreferenced(UnreferencedRule {
            target: f.require(target_role, "for.role")?,
            ignore_patterns: options.ignore_patterns,
        }),
        "file_size" => RuleKind::FileSize(FileSizeRule {
            target: f.require(target_role, "for.role")?,
            max_lines: f.require(dto.max_lines, "max_lines")?,
        }),
        "test_coverage" => RuleKind::TestCoverage(TestCoverageRule {
            from: f.require(from_role, "from.role")?,
        }),
        "forbidden_keywords" => RuleKind::ForbiddenKeywords(KeywordRule {
            from: f.require(from_role, "from.role")?,
            keywords: f.require(dto.contains_forbidden, "contains_forbidden")?,
        }),
        "required_structure" => RuleKind::RequiredStructure(StructureRule {
            directories: f.require(dto.directories, "directories")?,
        }),
        "documentation_required" => RuleKind::DocumentationRequired(DocumentationRule {
            target: f.require(target_role, "for.role")?,
            min_lines: f.require(dto.min_lines, "min_lines")?,
            requires_jsdoc: dto.requires_jsdoc.unwrap_or(true),
        }),
        "class_complexity" => RuleKind::ClassComplexity(ComplexityRule {
            target: f.require(target_role, "for.role")?,
            max_public_methods: f.require(dto.max_public_methods, "max_public_methods")?,
            max_properties: f.require(dto.max_properties, "max_properties")?,
        }),
        "minimum_test_ratio" => {
            let ratio = f.require(dto.global, "global.test_ratio")?.test_ratio;
            f.check_range(
                ratio,
                "global.test_ratio",
                (0.0..=1.0).contains(&ratio),
                "0 to 1",
            )?;
            RuleKind::MinimumTestRatio(TestRatioRule { test_ratio: ratio })
        }
        "granularity_metric" => {
            let target_loc = f.require(dto.target_loc_per_file, "target_loc_per_file")?;
            f.check_range(target_loc, "target_loc_per_file", target_loc > 0.0, "> 0")?;
            let multiplier = dto.warning_threshold_multiplier.unwrap_or(1.0);
            f.check_range(
                multiplier,
                "warning_threshold_multiplier",
                multiplier > 0.0,
                "> 0",
            )?;
            RuleKind::GranularityMetric(GranularityRule {
                target: f.require(target_role, "for.role")?,
                target_loc_per_file: target_loc,
                warning_threshold_multiplier: multiplier,
            })
        }
        "forbidden_patterns" => RuleKind::ForbiddenPatterns(PatternRule {
            from: f.require(from_role, "from.role")?,
            patterns: f.require(dto.contains_forbidden, "contains_forbidden")?,
        }),
        "barrel_purity" => {
            let file_pattern = f.require(
                dto.target.and_then(|t| t.file_pattern),
                "for.file_pattern",
            )?;
            f.check_regex(&file_pattern, "for.file_pattern")?;
            RuleKind::BarrelPurity(BarrelRule {
                file_pattern,
                patterns: f.require(dto.contains_forbidden, "contains_forbidden")?,
            })
        }
        other => {
            warn!("{context}: unknown rule kind `{other}`, rule ignored");
            return Ok(None);
        }
    };

    let severity = parse_severity(&dto.severity, &context)?;
    let mut meta = RuleMeta::new(dto.name, severity);
    meta.comment = dto.comment;

    Ok(Some(Rule::new(meta, kind)))
}

fn parse_severity(value: &str, context: &str) -> Result<Severity, LoadError> {
    value
        .parse::<Severity>()
        .map_err(|value| LoadError::UnknownSeverity {
            context: context.to_string(),
            value,
        })
}
