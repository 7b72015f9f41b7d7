//! `naming_pattern`: symbol paths must follow the role's naming convention.

use archgram_core::grammar::NamingPattern;
use archgram_core::{TypedRule, ValidationContext, Validator, Violation};

use crate::utils::compile_pattern;

/// Checks selected symbol paths against a regex.
///
/// Every rule is evaluated on its own, so one symbol may be reported by
/// several rules.
#[derive(Debug, Clone, Default)]
pub struct NamingValidator {
    rules: Vec<TypedRule<NamingPattern>>,
}

impl NamingValidator {
    /// Creates a validator for the given rules.
    #[must_use]
    pub fn new(rules: Vec<TypedRule<NamingPattern>>) -> Self {
        Self { rules }
    }
}

impl Validator for NamingValidator {
    fn name(&self) -> &'static str {
        "naming"
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();
        for rule in &self.rules {
            let Some(pattern) = compile_pattern(&rule.meta.name, &rule.body.pattern) else {
                continue;
            };
            for symbol in ctx.symbols {
                if !rule.body.target.matches(&symbol.role) || pattern.is_match(&symbol.path) {
                    continue;
                }
                let finding = format!(
                    "{} '{}' does not match naming pattern `{}`",
                    symbol.role, symbol.path, rule.body.pattern
                );
                violations.push(
                    rule.meta
                        .violation(&symbol.path, &finding)
                        .with_from_role(&symbol.role),
                );
            }
        }
        violations
    }
}
