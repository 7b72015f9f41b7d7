//! # archgram-core
//!
//! Core model for grammar-driven architecture checks.
//!
//! This crate provides the types every other archgram crate shares:
//!
//! - [`Symbol`] for exported declarations produced by a parser
//! - [`grammar`] for loading roles and rules from YAML, TOML or JSON
//! - [`SymbolParser`] as the seam between source parsing and checking
//! - [`RoleAssigner`] for stamping symbols with roles
//! - [`RuleSet`] for grouping rules by the validator that evaluates them
//! - [`Validator`] and [`ValidationContext`] for implementing checks
//! - [`Violation`] for representing findings, and [`dedup`] for collapsing them
//!
//! ## Example
//!
//! ```ignore
//! use archgram_core::{grammar, RoleAssigner, RuleSet};
//!
//! let grammar = grammar::load_from_path("grammar.yaml".as_ref())?;
//! let symbols = RoleAssigner::new(&grammar.roles).assign(symbols);
//! let rules = RuleSet::from_rules(&grammar.rules);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod dedup;
mod extract;
mod parser;
mod role;
mod source;
mod symbol;
mod types;
mod validator;

pub mod grammar;

pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use dedup::dedup;
pub use extract::{RuleSet, TypedRule};
pub use grammar::{Grammar, GrammarError, RoleSelector, RuleMeta};
pub use parser::{ParseError, StaticSymbols, SymbolParser};
pub use role::RoleAssigner;
pub use source::{ContentCache, DiskFiles, MemoryFiles, SourceFiles};
pub use symbol::{normalize_path, Symbol, SymbolKind, UNKNOWN_ROLE};
pub use types::{LintResult, Severity, Violation, PROJECT_FILE};
pub use validator::{ValidationContext, Validator, ValidatorBox};
