//! # archgram-rules
//!
//! Grammar validators for archgram.
//!
//! Each validator owns the rules of one family and implements
//! [`archgram_core::Validator`].
//!
//! ## Validators
//!
//! | Validator | Rule kinds |
//! |-----------|------------|
//! | [`NamingValidator`] | `naming_pattern` |
//! | [`DependencyValidator`] | `forbidden`, `required`, `forbidden` + `circular` |
//! | [`HygieneValidator`] | `find_synonyms`, `detect_unreferenced` |
//! | [`FileMetricsValidator`] | `file_size`, `test_coverage`, `documentation_required`, `class_complexity`, `granularity_metric` |
//! | [`CodePatternValidator`] | `forbidden_keywords`, `forbidden_patterns`, `barrel_purity` |
//! | [`StructureValidator`] | `required_structure`, `minimum_test_ratio` |
//!
//! ## Usage
//!
//! ```ignore
//! use archgram_core::{RuleSet, ValidationContext, Validator};
//! use archgram_rules::NamingValidator;
//!
//! let rules = RuleSet::from_rules(&grammar.rules);
//! let naming = NamingValidator::new(rules.naming.clone());
//! let violations = naming.validate(&ValidationContext::new(&symbols, &files));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod code_pattern;
mod dependency;
mod file_metrics;
mod hygiene;
mod naming;
mod structure;
mod utils;

pub mod similarity;

pub use code_pattern::CodePatternValidator;
pub use dependency::DependencyValidator;
pub use file_metrics::FileMetricsValidator;
pub use hygiene::HygieneValidator;
pub use naming::NamingValidator;
pub use similarity::jaro_winkler;
pub use structure::StructureValidator;

/// Re-export core types for convenience.
pub use archgram_core::{Validator, ValidatorBox, Violation};
