//! Run command implementation.

use anyhow::{bail, Context, Result};
use nobadfuncs_checker::{CheckRequest, Checker};

use super::output::{self, OutputFormat};

/// Runs the checker and prints its result.
///
/// Fails when any violation reaches the checker's `fail_on` threshold.
pub fn run(
    checker: &dyn Checker,
    request: &CheckRequest,
    format: OutputFormat,
    all: bool,
) -> Result<()> {
    if all {
        let references = checker.references(request).context("Analysis failed")?;
        for reference in &references {
            println!("{reference}");
        }
        return Ok(());
    }

    tracing::info!(
        "Running {} on {}",
        checker.name(),
        request.project_dir.display()
    );
    let result = checker.check(request).context("Analysis failed")?;

    output::print(&result, format, &request.project_dir)?;

    let threshold = checker.fail_on();
    if result.has_violations_at(threshold) {
        let failing = result
            .violations
            .iter()
            .filter(|v| v.severity >= threshold)
            .count();
        bail!("{} found {failing} violation(s) at or above {threshold}", checker.name());
    }

    Ok(())
}
