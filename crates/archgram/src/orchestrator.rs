//! Runs every validator that has rules to evaluate.
//!
//! Validators are registered in a fixed order (naming, dependency,
//! hygiene, file metrics, code pattern, structure) and only when their
//! bucket holds at least one rule. They run concurrently on the current
//! rayon pool; results are concatenated in registration order.

use archgram_core::{RuleSet, ValidationContext, ValidatorBox, Violation};
use archgram_rules::{
    CodePatternValidator, DependencyValidator, FileMetricsValidator, HygieneValidator,
    NamingValidator, StructureValidator,
};
use rayon::prelude::*;
use tracing::debug;

/// The validators instantiated for one rule set.
pub struct Orchestrator {
    validators: Vec<ValidatorBox>,
}

impl Orchestrator {
    /// Instantiates a validator for every non-empty rule family.
    #[must_use]
    pub fn new(rules: &RuleSet) -> Self {
        let mut validators: Vec<ValidatorBox> = Vec::new();

        if rules.has_naming() {
            validators.push(Box::new(NamingValidator::new(rules.naming.clone())));
        }
        if rules.has_dependency() {
            validators.push(Box::new(
                DependencyValidator::new()
                    .forbidden(rules.forbidden.clone())
                    .required(rules.required.clone())
                    .circular(rules.circular.clone()),
            ));
        }
        if rules.has_hygiene() {
            validators.push(Box::new(HygieneValidator::new(
                rules.synonyms.clone(),
                rules.unreferenced.clone(),
            )));
        }
        if rules.has_file_metrics() {
            validators.push(Box::new(
                FileMetricsValidator::new()
                    .file_size(rules.file_size.clone())
                    .test_coverage(rules.test_coverage.clone())
                    .documentation(rules.documentation.clone())
                    .class_complexity(rules.class_complexity.clone())
                    .granularity(rules.granularity.clone()),
            ));
        }
        if rules.has_code_pattern() {
            validators.push(Box::new(CodePatternValidator::new(
                rules.forbidden_keywords.clone(),
                rules.forbidden_patterns.clone(),
                rules.barrel_purity.clone(),
            )));
        }
        if rules.has_structure() {
            validators.push(Box::new(StructureValidator::new(
                rules.required_structure.clone(),
                rules.test_ratio.clone(),
            )));
        }

        Self { validators }
    }

    /// Names of the instantiated validators, in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.validators.iter().map(|v| v.name()).collect()
    }

    /// Returns `true` when no validator was instantiated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Runs all validators concurrently and concatenates their findings in
    /// registration order.
    #[must_use]
    pub fn run(&self, ctx: &ValidationContext<'_>) -> Vec<Violation> {
        if self.validators.is_empty() {
            return Vec::new();
        }

        let per_validator: Vec<Vec<Violation>> = self
            .validators
            .par_iter()
            .map(|validator| {
                let violations = validator.validate(ctx);
                debug!("{}: {} violations", validator.name(), violations.len());
                violations
            })
            .collect();

        per_validator.into_iter().flatten().collect()
    }
}

/// Validates `ctx` against `rules` in one call.
#[must_use]
pub fn run(rules: &RuleSet, ctx: &ValidationContext<'_>) -> Vec<Violation> {
    if rules.is_empty() {
        return Vec::new();
    }
    Orchestrator::new(rules).run(ctx)
}
