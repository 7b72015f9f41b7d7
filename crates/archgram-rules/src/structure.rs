//! Project structure: required directories and the test-to-production ratio.

use archgram_core::grammar::{StructureRule, TestRatioRule};
use archgram_core::{TypedRule, ValidationContext, Validator, Violation, PROJECT_FILE};

use crate::utils::{distinct_files, is_test_path};

/// Evaluates `required_structure` and `minimum_test_ratio` rules.
#[derive(Debug, Clone, Default)]
pub struct StructureValidator {
    required: Vec<TypedRule<StructureRule>>,
    test_ratio: Vec<TypedRule<TestRatioRule>>,
}

impl StructureValidator {
    /// Creates a validator for the given rules.
    #[must_use]
    pub fn new(
        required: Vec<TypedRule<StructureRule>>,
        test_ratio: Vec<TypedRule<TestRatioRule>>,
    ) -> Self {
        Self {
            required,
            test_ratio,
        }
    }
}

impl Validator for StructureValidator {
    fn name(&self) -> &'static str {
        "structure"
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();

        for rule in &self.required {
            for dir in &rule.body.directories {
                if !ctx.exists(dir) {
                    let finding = format!("required directory '{dir}' is missing");
                    violations.push(rule.meta.violation(dir, &finding));
                }
            }
        }

        if !self.test_ratio.is_empty() {
            let (tests, production) = count_files(ctx);
            for rule in &self.test_ratio {
                if let Some(v) = check_ratio(rule, tests, production) {
                    violations.push(v);
                }
            }
        }

        violations
    }
}

/// Counts distinct symbol paths as `(test files, production files)`.
fn count_files(ctx: &ValidationContext<'_>) -> (usize, usize) {
    let files = distinct_files(ctx.symbols);
    let tests = files.iter().filter(|s| is_test_path(&s.path)).count();
    (tests, files.len() - tests)
}

#[allow(clippy::cast_precision_loss)]
fn check_ratio(rule: &TypedRule<TestRatioRule>, tests: usize, production: usize) -> Option<Violation> {
    if production == 0 {
        return None;
    }
    let ratio = tests as f64 / production as f64;
    if ratio >= rule.body.test_ratio {
        return None;
    }
    let finding = format!(
        "test ratio {ratio:.2} ({tests} test files for {production} production files) is below {}",
        rule.body.test_ratio
    );
    Some(rule.meta.violation(PROJECT_FILE, &finding))
}
