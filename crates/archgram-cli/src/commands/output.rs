//! Output formatting for check results.

use std::fmt::Write as _;
use std::io::IsTerminal;

use anyhow::Result;
use archgram::{LintResult, Severity};

use crate::OutputFormat;

/// Prints results in the requested format.
pub fn print(result: &LintResult, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Text => render_text(result, std::io::stdout().is_terminal()),
        OutputFormat::Json => render_json(result)?,
        OutputFormat::Compact => render_compact(result),
    };
    print!("{rendered}");
    Ok(())
}

fn paint(text: &str, code: &str, color: bool) -> String {
    if color {
        format!("\x1b[{code}m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}

fn severity_code(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "31",
        Severity::Warning => "33",
        Severity::Info => "34",
    }
}

/// Human-readable report with a summary line.
pub fn render_text(result: &LintResult, color: bool) -> String {
    let mut out = String::new();

    for v in &result.violations {
        let _ = writeln!(out, "{} at {}", v.rule_name, v.file);
        let severity = paint(&v.severity.to_string(), severity_code(v.severity), color);
        let _ = writeln!(out, "  {severity}: {}", v.message);
        if let (Some(from), Some(to)) = (&v.from_role, &v.to_role) {
            let _ = writeln!(out, "  = roles: {from} -> {to}");
        }
        if let Some(dependency) = &v.dependency {
            let _ = writeln!(out, "  = dependency: {dependency}");
        }
        out.push('\n');
    }

    let (errors, warnings, infos) = result.count_by_severity();
    let summary_code = if errors > 0 {
        "31"
    } else if warnings > 0 {
        "33"
    } else {
        "32"
    };
    let summary = format!(
        "Found {errors} error(s), {warnings} warning(s), {infos} info(s) in {} file(s) ({} symbols)",
        result.files_checked, result.symbols_checked
    );
    let _ = writeln!(out, "{}", paint(&summary, summary_code, color));
    out
}

/// Pretty-printed JSON of the whole result.
pub fn render_json(result: &LintResult) -> Result<String> {
    let mut json = serde_json::to_string_pretty(result)?;
    json.push('\n');
    Ok(json)
}

/// One line per violation: `file: severity [rule] finding`.
pub fn render_compact(result: &LintResult) -> String {
    let mut out = String::new();
    for v in &result.violations {
        let _ = writeln!(out, "{}: {} {}", v.file, v.severity, v.message);
    }
    out
}
