//! Partitions a grammar's flat rule list into typed buckets.

use crate::grammar::{
    BarrelRule, ComplexityRule, DependencyTarget, DocumentationRule, FileSizeRule,
    GranularityRule, KeywordRule, NamingPattern, PatternRule, RoleEdge, RoleSelector, Rule,
    RuleKind, RuleMeta, StructureRule, SynonymRule, TestCoverageRule, TestRatioRule,
    UnreferencedRule,
};

/// A rule body paired with its name, severity and comment.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedRule<T> {
    /// Common rule fields.
    pub meta: RuleMeta,
    /// Kind-specific fields.
    pub body: T,
}

impl<T> TypedRule<T> {
    /// Creates a typed rule.
    #[must_use]
    pub fn new(meta: RuleMeta, body: T) -> Self {
        Self { meta, body }
    }
}

/// Rules grouped by the validator that evaluates them. Order within each
/// bucket follows grammar order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    /// `naming_pattern`
    pub naming: Vec<TypedRule<NamingPattern>>,
    /// `forbidden` with a role target.
    pub forbidden: Vec<TypedRule<RoleEdge>>,
    /// `required`
    pub required: Vec<TypedRule<RoleEdge>>,
    /// `allowed`; kept for completeness, no validator reads it.
    pub allowed: Vec<TypedRule<RoleEdge>>,
    /// `forbidden` with the circular target; the body is the `from` selector.
    pub circular: Vec<TypedRule<RoleSelector>>,
    /// `find_synonyms`
    pub synonyms: Vec<TypedRule<SynonymRule>>,
    /// `detect_unreferenced`
    pub unreferenced: Vec<TypedRule<UnreferencedRule>>,
    /// `file_size`
    pub file_size: Vec<TypedRule<FileSizeRule>>,
    /// `test_coverage`
    pub test_coverage: Vec<TypedRule<TestCoverageRule>>,
    /// `forbidden_keywords`
    pub forbidden_keywords: Vec<TypedRule<KeywordRule>>,
    /// `required_structure`
    pub required_structure: Vec<TypedRule<StructureRule>>,
    /// `documentation_required`
    pub documentation: Vec<TypedRule<DocumentationRule>>,
    /// `class_complexity`
    pub class_complexity: Vec<TypedRule<ComplexityRule>>,
    /// `minimum_test_ratio`
    pub test_ratio: Vec<TypedRule<TestRatioRule>>,
    /// `granularity_metric`
    pub granularity: Vec<TypedRule<GranularityRule>>,
    /// `forbidden_patterns`
    pub forbidden_patterns: Vec<TypedRule<PatternRule>>,
    /// `barrel_purity`
    pub barrel_purity: Vec<TypedRule<BarrelRule>>,
}

impl RuleSet {
    /// Partitions rules in a single pass.
    #[must_use]
    pub fn from_rules<'a, I>(rules: I) -> Self
    where
        I: IntoIterator<Item = &'a Rule>,
    {
        let mut set = Self::default();
        for rule in rules {
            set.push(rule.clone());
        }
        set
    }

    /// Adds one rule to its bucket.
    pub fn push(&mut self, rule: Rule) {
        let Rule { meta, kind } = rule;
        match kind {
            RuleKind::NamingPattern(body) => self.naming.push(TypedRule::new(meta, body)),
            RuleKind::Forbidden(body) => match body.to {
                DependencyTarget::Role(to) => self.forbidden.push(TypedRule::new(
                    meta,
                    RoleEdge {
                        from: body.from,
                        to,
                    },
                )),
                DependencyTarget::Circular => {
                    self.circular.push(TypedRule::new(meta, body.from));
                }
            },
            RuleKind::Required(body) => self.required.push(TypedRule::new(meta, body)),
            RuleKind::Allowed(body) => self.allowed.push(TypedRule::new(meta, body)),
            RuleKind::FindSynonyms(body) => self.synonyms.push(TypedRule::new(meta, body)),
            RuleKind::DetectUnreferenced(body) => {
                self.unreferenced.push(TypedRule::new(meta, body));
            }
            RuleKind::FileSize(body) => self.file_size.push(TypedRule::new(meta, body)),
            RuleKind::TestCoverage(body) => self.test_coverage.push(TypedRule::new(meta, body)),
            RuleKind::ForbiddenKeywords(body) => {
                self.forbidden_keywords.push(TypedRule::new(meta, body));
            }
            RuleKind::RequiredStructure(body) => {
                self.required_structure.push(TypedRule::new(meta, body));
            }
            RuleKind::DocumentationRequired(body) => {
                self.documentation.push(TypedRule::new(meta, body));
            }
            RuleKind::ClassComplexity(body) => {
                self.class_complexity.push(TypedRule::new(meta, body));
            }
            RuleKind::MinimumTestRatio(body) => self.test_ratio.push(TypedRule::new(meta, body)),
            RuleKind::GranularityMetric(body) => self.granularity.push(TypedRule::new(meta, body)),
            RuleKind::ForbiddenPatterns(body) => {
                self.forbidden_patterns.push(TypedRule::new(meta, body));
            }
            RuleKind::BarrelPurity(body) => self.barrel_purity.push(TypedRule::new(meta, body)),
        }
    }

    /// Rules the naming validator evaluates exist.
    #[must_use]
    pub fn has_naming(&self) -> bool {
        !self.naming.is_empty()
    }

    /// Rules the dependency validator evaluates exist. `allowed` rules alone
    /// produce nothing, so they do not count.
    #[must_use]
    pub fn has_dependency(&self) -> bool {
        !(self.forbidden.is_empty() && self.required.is_empty() && self.circular.is_empty())
    }

    /// Rules the hygiene validator evaluates exist.
    #[must_use]
    pub fn has_hygiene(&self) -> bool {
        !(self.synonyms.is_empty() && self.unreferenced.is_empty())
    }

    /// Rules the file metrics validator evaluates exist.
    #[must_use]
    pub fn has_file_metrics(&self) -> bool {
        !(self.file_size.is_empty()
            && self.test_coverage.is_empty()
            && self.documentation.is_empty()
            && self.class_complexity.is_empty()
            && self.granularity.is_empty())
    }

    /// Rules the code pattern validator evaluates exist.
    #[must_use]
    pub fn has_code_pattern(&self) -> bool {
        !(self.forbidden_keywords.is_empty()
            && self.forbidden_patterns.is_empty()
            && self.barrel_purity.is_empty())
    }

    /// Rules the structure validator evaluates exist.
    #[must_use]
    pub fn has_structure(&self) -> bool {
        !(self.required_structure.is_empty() && self.test_ratio.is_empty())
    }

    /// Returns true if no validator has anything to evaluate.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.has_naming()
            || self.has_dependency()
            || self.has_hygiene()
            || self.has_file_metrics()
            || self.has_code_pattern()
            || self.has_structure())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ForbiddenDependency;
    use crate::types::Severity;

    fn rule(name: &str, kind: RuleKind) -> Rule {
        Rule::new(RuleMeta::new(name, Severity::Error), kind)
    }

    #[test]
    fn forbidden_splits_by_target() {
        let rules = vec![
            rule(
                "layers",
                RuleKind::Forbidden(ForbiddenDependency {
                    from: RoleSelector::one("DOMAIN"),
                    to: DependencyTarget::Role(RoleSelector::one("INFRA")),
                }),
            ),
            rule(
                "cycles",
                RuleKind::Forbidden(ForbiddenDependency {
                    from: RoleSelector::All,
                    to: DependencyTarget::Circular,
                }),
            ),
        ];
        let set = RuleSet::from_rules(&rules);
        assert_eq!(set.forbidden.len(), 1);
        assert_eq!(set.forbidden[0].body.to, RoleSelector::one("INFRA"));
        assert_eq!(set.circular.len(), 1);
        assert_eq!(set.circular[0].meta.name, "cycles");
    }

    #[test]
    fn buckets_keep_grammar_order() {
        let rules = vec![
            rule(
                "b",
                RuleKind::FileSize(FileSizeRule {
                    target: RoleSelector::All,
                    max_lines: 1,
                }),
            ),
            rule(
                "a",
                RuleKind::FileSize(FileSizeRule {
                    target: RoleSelector::All,
                    max_lines: 2,
                }),
            ),
        ];
        let set = RuleSet::from_rules(&rules);
        let names: Vec<&str> = set.file_size.iter().map(|r| r.meta.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn allowed_alone_is_empty() {
        let rules = vec![rule(
            "ok",
            RuleKind::Allowed(RoleEdge {
                from: RoleSelector::All,
                to: RoleSelector::All,
            }),
        )];
        let set = RuleSet::from_rules(&rules);
        assert_eq!(set.allowed.len(), 1);
        assert!(!set.has_dependency());
        assert!(set.is_empty());
    }

    #[test]
    fn empty_rules_give_empty_set() {
        assert!(RuleSet::from_rules(&Vec::<Rule>::new()).is_empty());
    }

    #[test]
    fn structure_rule_marks_structure_bucket() {
        let rules = vec![rule(
            "ratio",
            RuleKind::MinimumTestRatio(TestRatioRule { test_ratio: 0.5 }),
        )];
        let set = RuleSet::from_rules(&rules);
        assert!(set.has_structure());
        assert!(!set.has_file_metrics());
        assert!(!set.is_empty());
    }
}
