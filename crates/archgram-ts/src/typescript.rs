//! TypeScript/JavaScript extractor using tree-sitter.

use std::path::Path;

use archgram_core::{ParseError, SymbolKind};
use tree_sitter::{Language, Node, Parser};

use crate::extractor::{ExportInfo, FileAnalysis, LanguageExtractor};

/// Extensions parsed with the TSX grammar (JSX allowed).
const TSX_EXTENSIONS: &[&str] = &["tsx", "jsx", "js", "mjs", "cjs"];

/// Every extension this extractor handles.
const EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"];

/// Name recorded for anonymous default exports.
const DEFAULT_EXPORT: &str = "default";

/// Extracts module specifiers and exported declarations from TypeScript
/// and JavaScript source.
pub struct TypeScriptExtractor {
    typescript: Language,
    tsx: Language,
}

impl TypeScriptExtractor {
    /// Creates a new extractor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            typescript: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            tsx: tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    fn language_for(&self, path: &Path) -> &Language {
        let is_tsx = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| TSX_EXTENSIONS.contains(&ext));
        if is_tsx {
            &self.tsx
        } else {
            &self.typescript
        }
    }

    fn text<'a>(node: &Node<'_>, src: &'a [u8]) -> &'a str {
        node.utf8_text(src).unwrap_or("")
    }

    /// Unquotes a `string` node.
    fn string_value(node: &Node<'_>, src: &[u8]) -> Option<String> {
        if node.kind() != "string" && node.kind() != "template_string" {
            return None;
        }
        let value = Self::text(node, src).trim_matches(|c| c == '"' || c == '\'' || c == '`');
        if value.is_empty() || value.contains("${") {
            return None;
        }
        Some(value.to_owned())
    }

    fn name_of(node: &Node<'_>, src: &[u8]) -> Option<String> {
        node.child_by_field_name("name")
            .map(|n| Self::text(&n, src).to_owned())
            .filter(|n| !n.is_empty())
    }

    /// Specifier of an `import` statement, including `import x = require(..)`.
    fn import_source(node: &Node<'_>, src: &[u8]) -> Option<String> {
        if let Some(source) = node.child_by_field_name("source") {
            return Self::string_value(&source, src);
        }
        let mut cursor = node.walk();
        let clause = node
            .named_children(&mut cursor)
            .find(|c| c.kind() == "import_require_clause")?;
        let source = clause.child_by_field_name("source")?;
        Self::string_value(&source, src)
    }

    /// Specifier of `require("x")` or `import("x")`.
    fn call_source(node: &Node<'_>, src: &[u8]) -> Option<String> {
        let function = node.child_by_field_name("function")?;
        let is_loader = function.kind() == "import"
            || (function.kind() == "identifier" && Self::text(&function, src) == "require");
        if !is_loader {
            return None;
        }
        let arguments = node.child_by_field_name("arguments")?;
        let mut cursor = arguments.walk();
        let first = arguments.named_children(&mut cursor).next()?;
        Self::string_value(&first, src)
    }

    /// Collects every module specifier in document order.
    fn collect_imports(root: &Node<'_>, src: &[u8]) -> Vec<String> {
        let mut imports = Vec::new();
        let mut stack = vec![*root];
        while let Some(node) = stack.pop() {
            let specifier = match node.kind() {
                "import_statement" => Self::import_source(&node, src),
                "export_statement" => node
                    .child_by_field_name("source")
                    .and_then(|s| Self::string_value(&s, src)),
                "call_expression" => Self::call_source(&node, src),
                _ => None,
            };
            if let Some(specifier) = specifier {
                imports.push(specifier);
            }

            let mut cursor = node.walk();
            let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
        imports
    }

    /// Exports declared by a declaration node.
    fn declaration_exports(node: &Node<'_>, src: &[u8], line: usize) -> Vec<ExportInfo> {
        let named = |kind: SymbolKind| -> Vec<ExportInfo> {
            Self::name_of(node, src)
                .map(|name| ExportInfo { line, name, kind })
                .into_iter()
                .collect()
        };
        match node.kind() {
            "class_declaration" | "abstract_class_declaration" => named(SymbolKind::Class),
            "interface_declaration" => named(SymbolKind::Interface),
            "function_declaration" | "generator_function_declaration" | "function_signature" => {
                named(SymbolKind::Function)
            }
            "type_alias_declaration" | "enum_declaration" => named(SymbolKind::Type),
            "lexical_declaration" | "variable_declaration" => {
                let mut cursor = node.walk();
                node.named_children(&mut cursor)
                    .filter(|c| c.kind() == "variable_declarator")
                    .filter_map(|c| {
                        let name = c.child_by_field_name("name")?;
                        (name.kind() == "identifier").then(|| ExportInfo {
                            line,
                            name: Self::text(&name, src).to_owned(),
                            kind: SymbolKind::Const,
                        })
                    })
                    .collect()
            }
            "ambient_declaration" => {
                let mut cursor = node.walk();
                node.named_children(&mut cursor)
                    .flat_map(|c| Self::declaration_exports(&c, src, line))
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    /// Exports introduced by one top-level `export` statement.
    fn statement_exports(node: &Node<'_>, src: &[u8]) -> Vec<ExportInfo> {
        let line = node.start_position().row + 1;

        let mut cursor = node.walk();
        let is_default = node.children(&mut cursor).any(|c| c.kind() == "default");
        if is_default {
            return vec![ExportInfo {
                line,
                name: DEFAULT_EXPORT.to_owned(),
                kind: SymbolKind::File,
            }];
        }

        // Re-exports are dependencies, not declarations of this file.
        if node.child_by_field_name("source").is_some() {
            return Vec::new();
        }

        if let Some(declaration) = node.child_by_field_name("declaration") {
            return Self::declaration_exports(&declaration, src, line);
        }

        // `export { a, b as c }`
        let mut cursor = node.walk();
        let Some(clause) = node
            .named_children(&mut cursor)
            .find(|c| c.kind() == "export_clause")
        else {
            return Vec::new();
        };
        let mut clause_cursor = clause.walk();
        clause
            .named_children(&mut clause_cursor)
            .filter(|c| c.kind() == "export_specifier")
            .filter_map(|spec| {
                let name = spec
                    .child_by_field_name("alias")
                    .or_else(|| spec.child_by_field_name("name"))?;
                Some(ExportInfo {
                    line,
                    name: Self::text(&name, src).to_owned(),
                    kind: SymbolKind::Const,
                })
            })
            .collect()
    }
}

impl Default for TypeScriptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageExtractor for TypeScriptExtractor {
    fn language_id(&self) -> &'static str {
        "typescript"
    }

    fn extensions(&self) -> &'static [&'static str] {
        EXTENSIONS
    }

    fn analyze(&self, path: &Path, source: &str) -> Result<FileAnalysis, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(self.language_for(path))
            .map_err(|e| ParseError::Language {
                language: self.language_id(),
                message: e.to_string(),
            })?;

        let src = source.as_bytes();
        let tree = parser.parse(src, None).ok_or_else(|| ParseError::Syntax {
            path: path.to_path_buf(),
        })?;
        let root = tree.root_node();

        let mut exports: Vec<ExportInfo> = Vec::new();
        let mut cursor = root.walk();
        for node in root.named_children(&mut cursor) {
            if node.kind() != "export_statement" {
                continue;
            }
            for export in Self::statement_exports(&node, src) {
                // Overload signatures repeat the same name.
                if !exports.iter().any(|e| e.name == export.name) {
                    exports.push(export);
                }
            }
        }

        Ok(FileAnalysis {
            imports: Self::collect_imports(&root, src),
            exports,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(src: &str) -> FileAnalysis {
        TypeScriptExtractor::new()
            .analyze(Path::new("src/a.ts"), src)
            .unwrap()
    }

    fn names(a: &FileAnalysis) -> Vec<(&str, SymbolKind)> {
        a.exports.iter().map(|e| (e.name.as_str(), e.kind)).collect()
    }

    #[test]
    fn extracts_static_imports_and_reexports() {
        let a = analyze(
            r#"
import { User } from "./user";
import type { Id } from '../shared/id';
import * as fs from "fs";
export * from "./order";
export { Item } from "./item";
"#,
        );
        assert_eq!(
            a.imports,
            vec!["./user", "../shared/id", "fs", "./order", "./item"]
        );
        assert!(a.exports.is_empty());
    }

    #[test]
    fn extracts_require_and_dynamic_import() {
        let a = analyze(
            r#"
import legacy = require("./legacy");
const db = require("./db");
async function load() { return import("./lazy"); }
const name = "x";
require(name);
"#,
        );
        assert_eq!(a.imports, vec!["./legacy", "./db", "./lazy"]);
    }

    #[test]
    fn classifies_exported_declarations() {
        let a = analyze(
            r"
export class UserService {}
export abstract class Base {}
export interface Repo {}
export function make() {}
export type Id = string;
export enum Color { Red }
export const a = 1, b = 2;
export let c = 3;
class Hidden {}
",
        );
        assert_eq!(
            names(&a),
            vec![
                ("UserService", SymbolKind::Class),
                ("Base", SymbolKind::Class),
                ("Repo", SymbolKind::Interface),
                ("make", SymbolKind::Function),
                ("Id", SymbolKind::Type),
                ("Color", SymbolKind::Type),
                ("a", SymbolKind::Const),
                ("b", SymbolKind::Const),
                ("c", SymbolKind::Const),
            ]
        );
    }

    #[test]
    fn default_export_is_a_file_symbol() {
        let a = analyze("export default class Page {}\n");
        assert_eq!(names(&a), vec![("default", SymbolKind::File)]);
    }

    #[test]
    fn export_clause_uses_alias() {
        let a = analyze("const x = 1;\nconst y = 2;\nexport { x, y as z };\n");
        assert_eq!(
            names(&a),
            vec![("x", SymbolKind::Const), ("z", SymbolKind::Const)]
        );
    }

    #[test]
    fn overloads_are_reported_once() {
        let a = analyze(
            "export function f(a: string): string;\nexport function f(a: number): number;\nexport function f(a: any) { return a; }\n",
        );
        assert_eq!(names(&a), vec![("f", SymbolKind::Function)]);
    }

    #[test]
    fn jsx_files_use_tsx_grammar() {
        let a = TypeScriptExtractor::new()
            .analyze(
                Path::new("src/view.jsx"),
                "import Button from './button';\nexport function View() { return <Button />; }\n",
            )
            .unwrap();
        assert_eq!(a.imports, vec!["./button"]);
        assert_eq!(names(&a), vec![("View", SymbolKind::Function)]);
    }

    #[test]
    fn handles_known_extensions() {
        let extractor = TypeScriptExtractor::new();
        assert!(extractor.handles(Path::new("a.mts")));
        assert!(extractor.handles(Path::new("a.cjs")));
        assert!(!extractor.handles(Path::new("a.rs")));
        assert!(!extractor.handles(Path::new("Makefile")));
    }
}
