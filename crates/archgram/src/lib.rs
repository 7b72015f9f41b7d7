//! # archgram
//!
//! Grammar-driven architecture checks for TypeScript and JavaScript
//! projects.
//!
//! A grammar names **roles** (regexes over project-relative paths) and
//! **rules** over those roles: layering, cycles, naming, hygiene, file
//! metrics, content patterns and project structure. archgram parses the
//! project into exported symbols, assigns each a role and reports every
//! place the code departs from the grammar.
//!
//! This is the facade crate that re-exports core types, the validators and
//! the TypeScript parser.
//!
//! ## Quick Start
//!
//! ```yaml
//! # grammar.yaml
//! roles:
//!   - { name: DOMAIN, path: "^src/domain/" }
//!   - { name: INFRA, path: "^src/infra/" }
//! rules:
//!   - name: domain-no-infra
//!     kind: forbidden
//!     from: { role: DOMAIN }
//!     to: { role: INFRA }
//! ```
//!
//! ```rust,ignore
//! let result = archgram::analyze("./my-project")?;
//! for violation in &result.violations {
//!     println!("{violation}");
//! }
//! ```
//!
//! ## Programmatic Usage
//!
//! ```rust,ignore
//! use archgram::{Analyzer, Config};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./my-project")
//!     .grammar_path("architecture.yaml")
//!     .config(Config::from_file("archgram.toml".as_ref())?)
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

// Re-export core types and traits
pub use archgram_core::*;

/// Built-in validators.
pub mod rules {
    pub use archgram_rules::*;
}

pub use archgram_ts::TypeScriptParser;

mod analyzer;
pub mod orchestrator;

pub use analyzer::{analyze, AnalyzeError, Analyzer, AnalyzerBuilder};
