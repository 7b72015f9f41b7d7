//! Symbols produced by a parser and consumed by validators.

use serde::{Deserialize, Serialize};

/// Role given to symbols whose path matches no role definition.
pub const UNKNOWN_ROLE: &str = "UNKNOWN";

/// Kind of declaration a symbol stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    /// `export class Foo`
    Class,
    /// `export interface Foo`
    Interface,
    /// `export function foo()`
    Function,
    /// `export type Foo = ...` and enums.
    Type,
    /// `export const foo = ...`
    Const,
    /// Whole-file placeholder for files without named exports.
    File,
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Function => "function",
            Self::Type => "type",
            Self::Const => "const",
            Self::File => "file",
        };
        f.write_str(s)
    }
}

/// One exported declaration (or a whole file).
///
/// `path` is project-relative with forward slashes. `dependencies` holds the
/// paths of other analyzed files this symbol's file imports, in import order
/// and without duplicates; external imports are omitted by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    /// Project-relative, forward-slash path of the declaring file.
    pub path: String,
    /// Declared identifier, or the file stem for placeholders.
    pub name: String,
    /// Role name, [`UNKNOWN_ROLE`] until assigned.
    #[serde(default = "unknown_role")]
    pub role: String,
    /// Resolved dependency paths.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Declaration kind.
    pub kind: SymbolKind,
}

fn unknown_role() -> String {
    UNKNOWN_ROLE.to_string()
}

impl Symbol {
    /// Creates a symbol without a role.
    #[must_use]
    pub fn new(path: impl Into<String>, name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            path: normalize_path(&path.into()),
            name: name.into(),
            role: unknown_role(),
            dependencies: Vec::new(),
            kind,
        }
    }

    /// Sets the resolved dependency paths, dropping duplicates but keeping order.
    #[must_use]
    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for dep in dependencies {
            let dep = normalize_path(&dep.into());
            if !self.dependencies.contains(&dep) {
                self.dependencies.push(dep);
            }
        }
        self
    }

    /// Sets the role directly. Used by tests and by callers that assign roles
    /// outside of [`crate::RoleAssigner`].
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Returns the file name portion of the path.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Normalizes a relative path to forward slashes without a leading `./`.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let replaced = path.replace('\\', "/");
    let mut trimmed = replaced.as_str();
    while let Some(rest) = trimmed.strip_prefix("./") {
        trimmed = rest;
    }
    trimmed.to_string()
}
