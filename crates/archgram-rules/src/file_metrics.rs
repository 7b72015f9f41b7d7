//! Per-file metrics: size, test coverage, documentation, class complexity
//! and project-wide granularity.
//!
//! Files are read through the context (cache first) in parallel, one task
//! per file. A file that cannot be read is skipped for that check only.

use std::sync::LazyLock;

use archgram_core::grammar::{
    ComplexityRule, DocumentationRule, FileSizeRule, GranularityRule, TestCoverageRule,
};
use archgram_core::{
    Symbol, TypedRule, ValidationContext, Validator, Violation, PROJECT_FILE,
};
use rayon::prelude::*;
use regex::Regex;

use crate::utils::{files_with_role, line_count};

/// Opening of a block documentation comment.
const DOC_BLOCK_OPENING: &str = "/**";

/// Test file suffixes tried by `test_coverage`.
const TEST_SUFFIXES: &[&str] = &["test", "spec"];

/// Lines that look like a public method declaration with a body.
static PUBLIC_METHOD: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(?:public[ \t]+)?(?:static[ \t]+)?(?:async[ \t]+)?(?:get[ \t]+|set[ \t]+)?([A-Za-z_$][\w$]*)[ \t]*(?:<[^>]*>)?\([^)]*\)[^;{]*\{",
    )
    .ok()
});

/// Lines that look like a class property declaration.
static PROPERTY: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(?:(?:(?:public|private|protected|readonly|static|declare)[ \t]+)+#?[A-Za-z_$][\w$]*[?!]?[ \t]*(?::[^;=(){}]+)?(?:=[^;]*)?|#?[A-Za-z_$][\w$]*[?!]?[ \t]*:[^;=(){}]+(?:=[^;]*)?);",
    )
    .ok()
});

/// Identifiers the method pattern picks up from control flow.
const NOT_METHODS: &[&str] = &[
    "if", "for", "while", "switch", "catch", "function", "return", "constructor", "super",
    "else", "do", "try", "with",
];

/// Evaluates `file_size`, `test_coverage`, `documentation_required`,
/// `class_complexity` and `granularity_metric` rules.
#[derive(Debug, Clone, Default)]
pub struct FileMetricsValidator {
    file_size: Vec<TypedRule<FileSizeRule>>,
    test_coverage: Vec<TypedRule<TestCoverageRule>>,
    documentation: Vec<TypedRule<DocumentationRule>>,
    class_complexity: Vec<TypedRule<ComplexityRule>>,
    granularity: Vec<TypedRule<GranularityRule>>,
}

impl FileMetricsValidator {
    /// Creates an empty validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `file_size` rules.
    #[must_use]
    pub fn file_size(mut self, rules: Vec<TypedRule<FileSizeRule>>) -> Self {
        self.file_size = rules;
        self
    }

    /// Sets `test_coverage` rules.
    #[must_use]
    pub fn test_coverage(mut self, rules: Vec<TypedRule<TestCoverageRule>>) -> Self {
        self.test_coverage = rules;
        self
    }

    /// Sets `documentation_required` rules.
    #[must_use]
    pub fn documentation(mut self, rules: Vec<TypedRule<DocumentationRule>>) -> Self {
        self.documentation = rules;
        self
    }

    /// Sets `class_complexity` rules.
    #[must_use]
    pub fn class_complexity(mut self, rules: Vec<TypedRule<ComplexityRule>>) -> Self {
        self.class_complexity = rules;
        self
    }

    /// Sets `granularity_metric` rules.
    #[must_use]
    pub fn granularity(mut self, rules: Vec<TypedRule<GranularityRule>>) -> Self {
        self.granularity = rules;
        self
    }
}

impl Validator for FileMetricsValidator {
    fn name(&self) -> &'static str {
        "file-metrics"
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();
        for rule in &self.file_size {
            violations.extend(check_file_size(rule, ctx));
        }
        for rule in &self.test_coverage {
            violations.extend(check_test_coverage(rule, ctx));
        }
        for rule in &self.documentation {
            violations.extend(check_documentation(rule, ctx));
        }
        for rule in &self.class_complexity {
            violations.extend(check_class_complexity(rule, ctx));
        }
        for rule in &self.granularity {
            violations.extend(check_granularity(rule, ctx));
        }
        violations
    }
}

/// Runs `check` on every readable file in parallel, keeping file order.
fn scan_files<F>(files: &[&Symbol], ctx: &ValidationContext<'_>, check: F) -> Vec<Violation>
where
    F: Fn(&Symbol, &str) -> Vec<Violation> + Sync,
{
    files
        .par_iter()
        .map(|&symbol| {
            ctx.content(&symbol.path)
                .map(|content| check(symbol, &content))
                .unwrap_or_default()
        })
        .flatten_iter()
        .collect()
}

fn check_file_size(rule: &TypedRule<FileSizeRule>, ctx: &ValidationContext<'_>) -> Vec<Violation> {
    let max = rule.body.max_lines;
    let files = files_with_role(ctx.symbols, &rule.body.target);
    scan_files(&files, ctx, |symbol, content| {
        let lines = line_count(content);
        if lines <= max {
            return Vec::new();
        }
        let finding = format!("'{}' has {lines} lines (max {max})", symbol.path);
        vec![rule
            .meta
            .violation(&symbol.path, &finding)
            .with_from_role(&symbol.role)]
    })
}

/// Test files that would cover `path`, beside it and under the parallel
/// test root.
pub(crate) fn test_candidates(path: &str) -> Vec<String> {
    let (stem, ext) = match path.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.contains('/') => (stem, ext),
        _ => (path, ""),
    };
    let parallel = match stem.strip_prefix("src/") {
        Some(rest) => format!("tests/{rest}"),
        None => format!("tests/{stem}"),
    };

    let mut candidates = Vec::with_capacity(TEST_SUFFIXES.len() * 2);
    for root in [stem, parallel.as_str()] {
        for suffix in TEST_SUFFIXES {
            if ext.is_empty() {
                candidates.push(format!("{root}.{suffix}"));
            } else {
                candidates.push(format!("{root}.{suffix}.{ext}"));
            }
        }
    }
    candidates
}

fn check_test_coverage(
    rule: &TypedRule<TestCoverageRule>,
    ctx: &ValidationContext<'_>,
) -> Vec<Violation> {
    files_with_role(ctx.symbols, &rule.body.from)
        .par_iter()
        .filter_map(|symbol| {
            let candidates = test_candidates(&symbol.path);
            if candidates.iter().any(|c| ctx.exists(c)) {
                return None;
            }
            let finding = format!(
                "'{}' has no test file (looked for {})",
                symbol.path,
                candidates.join(", ")
            );
            Some(
                rule.meta
                    .violation(&symbol.path, &finding)
                    .with_from_role(&symbol.role),
            )
        })
        .collect()
}

fn check_documentation(
    rule: &TypedRule<DocumentationRule>,
    ctx: &ValidationContext<'_>,
) -> Vec<Violation> {
    if !rule.body.requires_jsdoc {
        return Vec::new();
    }
    let min = rule.body.min_lines;
    let files = files_with_role(ctx.symbols, &rule.body.target);
    scan_files(&files, ctx, |symbol, content| {
        let lines = line_count(content);
        if lines < min || content.contains(DOC_BLOCK_OPENING) {
            return Vec::new();
        }
        let finding = format!(
            "'{}' has {lines} lines but no {DOC_BLOCK_OPENING} documentation comment",
            symbol.path
        );
        vec![rule
            .meta
            .violation(&symbol.path, &finding)
            .with_from_role(&symbol.role)]
    })
}

/// Heuristic `(public methods, properties)` counts.
pub(crate) fn complexity_counts(content: &str) -> (usize, usize) {
    let methods = PUBLIC_METHOD.as_ref().map_or(0, |re| {
        re.captures_iter(content)
            .filter(|caps| {
                caps.get(1)
                    .is_some_and(|name| !NOT_METHODS.contains(&name.as_str()))
            })
            .count()
    });
    let properties = PROPERTY
        .as_ref()
        .map_or(0, |re| re.find_iter(content).count());
    (methods, properties)
}

fn check_class_complexity(
    rule: &TypedRule<ComplexityRule>,
    ctx: &ValidationContext<'_>,
) -> Vec<Violation> {
    let ComplexityRule {
        max_public_methods,
        max_properties,
        ..
    } = rule.body;
    let files = files_with_role(ctx.symbols, &rule.body.target);
    scan_files(&files, ctx, |symbol, content| {
        let (methods, properties) = complexity_counts(content);
        let mut found = Vec::new();
        if methods > max_public_methods {
            let finding = format!(
                "'{}' has {methods} public methods (max {max_public_methods})",
                symbol.path
            );
            found.push(
                rule.meta
                    .violation(&symbol.path, &finding)
                    .with_from_role(&symbol.role),
            );
        }
        if properties > max_properties {
            let finding = format!(
                "'{}' has {properties} properties (max {max_properties})",
                symbol.path
            );
            found.push(
                rule.meta
                    .violation(&symbol.path, &finding)
                    .with_from_role(&symbol.role),
            );
        }
        found
    })
}

fn check_granularity(
    rule: &TypedRule<GranularityRule>,
    ctx: &ValidationContext<'_>,
) -> Vec<Violation> {
    let files = files_with_role(ctx.symbols, &rule.body.target);
    if files.is_empty() {
        return Vec::new();
    }
    let line_counts: Vec<usize> = files
        .par_iter()
        .filter_map(|symbol| ctx.content(&symbol.path).map(|c| line_count(&c)))
        .collect();
    if line_counts.is_empty() {
        return Vec::new();
    }

    #[allow(clippy::cast_precision_loss)]
    let average = line_counts.iter().sum::<usize>() as f64 / line_counts.len() as f64;
    let limit = rule.body.target_loc_per_file * rule.body.warning_threshold_multiplier;
    if average <= limit {
        return Vec::new();
    }
    let finding = format!(
        "average file length is {average:.1} lines across {} files (target {} x {})",
        line_counts.len(),
        rule.body.target_loc_per_file,
        rule.body.warning_threshold_multiplier
    );
    vec![rule.meta.violation(PROJECT_FILE, &finding)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use archgram_core::{ContentCache, MemoryFiles, RoleSelector, RuleMeta, Severity, SymbolKind};

    fn sym(path: &str, role: &str) -> Symbol {
        Symbol::new(path, "x", SymbolKind::File).with_role(role)
    }

    fn meta(name: &str) -> RuleMeta {
        RuleMeta::new(name, Severity::Warning)
    }

    fn lines(n: usize) -> String {
        vec!["x"; n].join("\n")
    }

    fn run(validator: &FileMetricsValidator, symbols: &[Symbol], files: &MemoryFiles) -> Vec<Violation> {
        validator.validate(&ValidationContext::new(symbols, files))
    }

    fn size_rule(max: usize) -> FileMetricsValidator {
        FileMetricsValidator::new().file_size(vec![TypedRule::new(
            meta("small-files"),
            FileSizeRule {
                target: RoleSelector::All,
                max_lines: max,
            },
        )])
    }

    #[test]
    fn file_size_boundary() {
        let symbols = vec![sym("src/a.ts", "DOMAIN")];

        let at_limit = MemoryFiles::new().with_file("src/a.ts", lines(10));
        assert!(run(&size_rule(10), &symbols, &at_limit).is_empty());

        let over = MemoryFiles::new().with_file("src/a.ts", lines(11));
        let violations = run(&size_rule(10), &symbols, &over);
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].message,
            "[small-files] 'src/a.ts' has 11 lines (max 10)"
        );
    }

    #[test]
    fn unreadable_file_is_skipped() {
        let symbols = vec![sym("src/gone.ts", "DOMAIN"), sym("src/big.ts", "DOMAIN")];
        let files = MemoryFiles::new().with_file("src/big.ts", lines(50));
        let violations = run(&size_rule(10), &symbols, &files);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].file, "src/big.ts");
    }

    #[test]
    fn cached_content_wins_over_files() {
        let symbols = vec![sym("src/a.ts", "DOMAIN")];
        let files = MemoryFiles::new().with_file("src/a.ts", lines(50));
        let mut cache = ContentCache::new();
        cache.insert("src/a.ts".to_string(), lines(5));
        let ctx = ValidationContext::new(&symbols, &files).with_cache(&cache);
        assert!(size_rule(10).validate(&ctx).is_empty());
    }

    #[test]
    fn one_report_per_file_not_per_symbol() {
        let symbols = vec![sym("src/a.ts", "DOMAIN"), sym("src/a.ts", "DOMAIN")];
        let files = MemoryFiles::new().with_file("src/a.ts", lines(20));
        assert_eq!(run(&size_rule(10), &symbols, &files).len(), 1);
    }

    #[test]
    fn test_candidates_cover_both_conventions_and_roots() {
        assert_eq!(
            test_candidates("src/domain/user.ts"),
            vec![
                "src/domain/user.test.ts",
                "src/domain/user.spec.ts",
                "tests/domain/user.test.ts",
                "tests/domain/user.spec.ts",
            ]
        );
        assert_eq!(
            test_candidates("lib/user.js"),
            vec![
                "lib/user.test.js",
                "lib/user.spec.js",
                "tests/lib/user.test.js",
                "tests/lib/user.spec.js",
            ]
        );
    }

    #[test]
    fn test_coverage_accepts_any_candidate() {
        let validator = FileMetricsValidator::new().test_coverage(vec![TypedRule::new(
            meta("tested"),
            TestCoverageRule {
                from: RoleSelector::one("DOMAIN"),
            },
        )]);
        let symbols = vec![
            sym("src/domain/user.ts", "DOMAIN"),
            sym("src/domain/order.ts", "DOMAIN"),
            sym("src/app/main.ts", "APP"),
        ];
        let files = MemoryFiles::new().with_file("tests/domain/user.spec.ts", "");
        let violations = run(&validator, &symbols, &files);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].file, "src/domain/order.ts");
        assert!(violations[0].message.contains("src/domain/order.test.ts"));
    }

    #[test]
    fn test_files_in_the_role_are_checked_too() {
        let validator = FileMetricsValidator::new().test_coverage(vec![TypedRule::new(
            meta("tested"),
            TestCoverageRule {
                from: RoleSelector::one("DOMAIN"),
            },
        )]);
        let symbols = vec![
            sym("src/domain/user.ts", "DOMAIN"),
            sym("src/domain/user.test.ts", "DOMAIN"),
        ];
        let files = MemoryFiles::new().with_file("src/domain/user.test.ts", "");
        let violations = run(&validator, &symbols, &files);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].file, "src/domain/user.test.ts");
        assert!(violations[0]
            .message
            .contains("src/domain/user.test.test.ts"));
    }

    #[test]
    fn documentation_needs_doc_block_on_long_files() {
        let validator = FileMetricsValidator::new().documentation(vec![TypedRule::new(
            meta("docs"),
            DocumentationRule {
                target: RoleSelector::All,
                min_lines: 5,
                requires_jsdoc: true,
            },
        )]);
        let symbols = vec![
            sym("short.ts", "A"),
            sym("long.ts", "A"),
            sym("documented.ts", "A"),
        ];
        let files = MemoryFiles::new()
            .with_file("short.ts", lines(4))
            .with_file("long.ts", lines(5))
            .with_file("documented.ts", format!("/** Orders. */\n{}", lines(10)));
        let violations = run(&validator, &symbols, &files);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].file, "long.ts");
    }

    #[test]
    fn documentation_switch_off_disables_check() {
        let validator = FileMetricsValidator::new().documentation(vec![TypedRule::new(
            meta("docs"),
            DocumentationRule {
                target: RoleSelector::All,
                min_lines: 1,
                requires_jsdoc: false,
            },
        )]);
        let symbols = vec![sym("long.ts", "A")];
        let files = MemoryFiles::new().with_file("long.ts", lines(100));
        assert!(run(&validator, &symbols, &files).is_empty());
    }

    const SERVICE: &str = r"
export class UserService {
  private readonly repo: UserRepository;
  public cache: Map<string, User> = new Map();
  count = 0;
  name: string;

  constructor(repo: UserRepository) {
    this.repo = repo;
  }

  async findUser(id: string): Promise<User> {
    if (this.cache.has(id)) {
      return this.cache.get(id);
    }
    return this.repo.find(id);
  }

  public save(user: User): void {
    this.repo.save(user);
  }

  static create(): UserService {
    return new UserService(new UserRepository());
  }

  private helper(): void {
  }
}
";

    #[test]
    fn complexity_counts_are_heuristic_but_stable() {
        // findUser, save, create; `private helper` and `constructor` excluded.
        // repo, cache, name; `count = 0;` has neither modifier nor type.
        assert_eq!(complexity_counts(SERVICE), (3, 3));
    }

    #[test]
    fn complexity_reports_each_threshold_independently() {
        let rule = |methods, properties| {
            FileMetricsValidator::new().class_complexity(vec![TypedRule::new(
                meta("complexity"),
                ComplexityRule {
                    target: RoleSelector::All,
                    max_public_methods: methods,
                    max_properties: properties,
                },
            )])
        };
        let symbols = vec![sym("src/user.service.ts", "SERVICE")];
        let files = MemoryFiles::new().with_file("src/user.service.ts", SERVICE);

        assert!(run(&rule(3, 3), &symbols, &files).is_empty());
        assert_eq!(run(&rule(2, 3), &symbols, &files).len(), 1);
        let both = run(&rule(2, 2), &symbols, &files);
        assert_eq!(both.len(), 2);
        assert!(both[0].message.contains("3 public methods (max 2)"));
        assert!(both[1].message.contains("3 properties (max 2)"));
    }

    fn granularity(target: f64, multiplier: f64) -> FileMetricsValidator {
        FileMetricsValidator::new().granularity(vec![TypedRule::new(
            meta("granularity"),
            GranularityRule {
                target: RoleSelector::All,
                target_loc_per_file: target,
                warning_threshold_multiplier: multiplier,
            },
        )])
    }

    #[test]
    fn granularity_averages_readable_files() {
        let symbols = vec![sym("a.ts", "A"), sym("b.ts", "A"), sym("gone.ts", "A")];
        let files = MemoryFiles::new()
            .with_file("a.ts", lines(100))
            .with_file("b.ts", lines(300));

        assert!(run(&granularity(100.0, 2.0), &symbols, &files).is_empty());

        let violations = run(&granularity(100.0, 1.5), &symbols, &files);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].file, PROJECT_FILE);
        assert_eq!(
            violations[0].message,
            "[granularity] average file length is 200.0 lines across 2 files (target 100 x 1.5)"
        );
    }

    #[test]
    fn granularity_averages_only_the_selected_role() {
        let validator = FileMetricsValidator::new().granularity(vec![TypedRule::new(
            meta("granularity"),
            GranularityRule {
                target: RoleSelector::one("DOMAIN"),
                target_loc_per_file: 100.0,
                warning_threshold_multiplier: 1.0,
            },
        )]);
        let symbols = vec![sym("src/domain/a.ts", "DOMAIN"), sym("src/infra/big.ts", "INFRA")];
        let files = MemoryFiles::new()
            .with_file("src/domain/a.ts", lines(50))
            .with_file("src/infra/big.ts", lines(900));
        assert!(run(&validator, &symbols, &files).is_empty());
    }

    #[test]
    fn granularity_without_symbols_or_readable_files_is_silent() {
        let files = MemoryFiles::new();
        assert!(run(&granularity(1.0, 1.0), &[], &files).is_empty());
        assert!(run(&granularity(1.0, 1.0), &[sym("gone.ts", "A")], &files).is_empty());
    }
}
