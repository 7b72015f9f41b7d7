//! # archgram-ts
//!
//! Tree-sitter based symbol parser for TypeScript and JavaScript projects.
//!
//! This crate implements [`archgram_core::SymbolParser`]:
//!
//! - [`LanguageExtractor`] trait for pluggable language support
//! - [`TypeScriptExtractor`] for import/export extraction from one file
//! - [`resolve`] for mapping relative import specifiers onto project files
//! - [`TypeScriptParser`] for walking a project and producing symbols

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod extractor;
pub mod parser;
pub mod resolve;
pub mod typescript;

pub use extractor::{ExportInfo, FileAnalysis, LanguageExtractor};
pub use parser::TypeScriptParser;
pub use typescript::TypeScriptExtractor;
