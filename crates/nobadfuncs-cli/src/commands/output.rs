//! Output formatting for check results.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;
use nobadfuncs_core::{LintResult, Severity};

/// Output format for check results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One line per violation.
    Compact,
    /// Annotated source snippets.
    Pretty,
}

/// Prints `result` in `format`. `root` locates sources for snippets.
pub fn print(result: &LintResult, format: OutputFormat, root: &Path) -> Result<()> {
    print!("{}", render(result, format, root)?);
    Ok(())
}

/// Renders `result` in `format`.
pub fn render(result: &LintResult, format: OutputFormat, root: &Path) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => render_text(result),
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(result)?),
        OutputFormat::Compact => render_compact(result),
        OutputFormat::Pretty => render_pretty(result, root),
    })
}

fn render_text(result: &LintResult) -> String {
    let (errors, warnings, infos) = result.count_by_severity();
    let mut out = String::new();

    for violation in &result.violations {
        let severity = match violation.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };

        let _ = writeln!(out, "{} {} at {}", violation.code, violation.rule, violation.location);
        let _ = writeln!(out, "  {severity}: {}", violation.message);
        if let Some(suggestion) = &violation.suggestion {
            let _ = writeln!(out, "  = help: {}", suggestion.message);
        }
        if let Some(doc) = &violation.doc_ref {
            let _ = writeln!(out, "  = see: {doc}");
        }
        out.push('\n');
    }

    let color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };
    let _ = writeln!(
        out,
        "{color}Found {errors} error(s), {warnings} warning(s), {infos} info(s) in {} file(s)\x1b[0m",
        result.files_checked
    );
    out
}

fn render_compact(result: &LintResult) -> String {
    result
        .violations
        .iter()
        .map(|v| format!("{v}\n"))
        .collect()
}

fn render_pretty(result: &LintResult, root: &Path) -> String {
    let mut out = String::new();
    for violation in &result.violations {
        match std::fs::read_to_string(root.join(&violation.location.file)) {
            Ok(source) => {
                let report = miette::Report::new(violation.to_diagnostic(source));
                let _ = writeln!(out, "{report:?}");
            }
            Err(e) => {
                tracing::debug!("No source for {}: {e}", violation.location.file.display());
                let _ = writeln!(out, "{violation}");
            }
        }
    }
    out.push_str(&render_summary(result));
    out
}

fn render_summary(result: &LintResult) -> String {
    let (errors, warnings, infos) = result.count_by_severity();
    format!(
        "Found {errors} error(s), {warnings} warning(s), {infos} info(s) in {} file(s)\n",
        result.files_checked
    )
}
