//! Resolution of relative module specifiers onto project files.
//!
//! Bare specifiers (`react`, `@scope/pkg`, `node:fs`) are external and never
//! resolve. Relative specifiers are joined with the importer's directory and
//! tried: the exact path, then each source extension, then `index.*` inside
//! the directory. A `.js` specifier also matches the `.ts` file it was
//! compiled from, as ESM TypeScript projects write it.

use std::collections::HashSet;

/// Extensions tried, in order, when a specifier omits one.
pub const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"];

/// Emitted extensions and the source extensions they stand for.
const EMITTED_TO_SOURCE: &[(&str, &[&str])] = &[
    ("js", &["ts", "tsx"]),
    ("jsx", &["tsx"]),
    ("mjs", &["mts"]),
    ("cjs", &["cts"]),
];

/// Returns `true` for `./x`, `../x`, `.` and `..`.
#[must_use]
pub fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

/// Joins `specifier` onto the directory of `importer`, folding `.` and `..`.
///
/// Returns `None` when the result would leave the project root.
#[must_use]
pub fn join(importer: &str, specifier: &str) -> Option<String> {
    let mut parts: Vec<&str> = importer.split('/').collect();
    parts.pop();
    for segment in specifier.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            s => parts.push(s),
        }
    }
    Some(parts.join("/"))
}

fn candidates(base: &str) -> Vec<String> {
    let mut out = Vec::with_capacity(SOURCE_EXTENSIONS.len() * 2 + 3);
    if !base.is_empty() {
        out.push(base.to_string());
        if let Some((stem, ext)) = base.rsplit_once('.') {
            if let Some((_, sources)) = EMITTED_TO_SOURCE.iter().find(|(e, _)| *e == ext) {
                out.extend(sources.iter().map(|s| format!("{stem}.{s}")));
            }
        }
        out.extend(SOURCE_EXTENSIONS.iter().map(|ext| format!("{base}.{ext}")));
    }
    let dir = if base.is_empty() {
        String::new()
    } else {
        format!("{base}/")
    };
    out.extend(SOURCE_EXTENSIONS.iter().map(|ext| format!("{dir}index.{ext}")));
    out
}

/// Resolves `specifier`, imported from `importer`, to a path in `files`.
#[must_use]
pub fn resolve(importer: &str, specifier: &str, files: &HashSet<String>) -> Option<String> {
    if !is_relative(specifier) {
        return None;
    }
    let base = join(importer, specifier)?;
    candidates(&base).into_iter().find(|c| files.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(paths: &[&str]) -> HashSet<String> {
        paths.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn bare_specifiers_are_external() {
        let f = files(&["react.ts"]);
        assert_eq!(resolve("a.ts", "react", &f), None);
        assert_eq!(resolve("a.ts", "@scope/pkg", &f), None);
    }

    #[test]
    fn tries_extensions_then_index() {
        let f = files(&[
            "src/domain/user.ts",
            "src/infra/index.ts",
            "src/view/button.tsx",
        ]);
        assert_eq!(
            resolve("src/domain/a.ts", "./user", &f).as_deref(),
            Some("src/domain/user.ts")
        );
        assert_eq!(
            resolve("src/domain/a.ts", "../infra", &f).as_deref(),
            Some("src/infra/index.ts")
        );
        assert_eq!(
            resolve("src/view/page.tsx", "./button", &f).as_deref(),
            Some("src/view/button.tsx")
        );
    }

    #[test]
    fn js_specifier_maps_to_ts_source() {
        let f = files(&["src/user.ts"]);
        assert_eq!(
            resolve("src/a.ts", "./user.js", &f).as_deref(),
            Some("src/user.ts")
        );
    }

    #[test]
    fn exact_file_wins_over_probing() {
        let f = files(&["src/data.js", "src/data.js.ts"]);
        assert_eq!(
            resolve("src/a.ts", "./data.js", &f).as_deref(),
            Some("src/data.js")
        );
    }

    #[test]
    fn escaping_the_root_does_not_resolve() {
        let f = files(&["index.ts"]);
        assert_eq!(resolve("a.ts", "../index", &f), None);
        assert_eq!(resolve("src/a.ts", "..", &f).as_deref(), Some("index.ts"));
    }

    #[test]
    fn unknown_targets_do_not_resolve() {
        assert_eq!(resolve("src/a.ts", "./missing", &files(&[])), None);
    }
}
