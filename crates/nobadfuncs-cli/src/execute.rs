//! Turns a command outcome into a process exit code.

use crate::asset::AssetRootCmd;

/// Parses `args` against the root command and runs it.
///
/// Returns clap's exit code for parse failures (0 for `--help` and
/// `--version`), 1 when the command fails and 0 on success.
pub fn execute_with_default_params(root: &AssetRootCmd, args: Vec<String>) -> i32 {
    let matches = match root.command().try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(e) => return report_clap_error(&e),
    };

    match root.run_matches(&matches) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {e:#}");
            1
        }
    }
}

/// Prints a clap error (or help text) and returns its exit code.
pub fn report_clap_error(e: &clap::Error) -> i32 {
    if let Err(io) = e.print() {
        tracing::warn!("Failed to print usage: {io}");
    }
    e.exit_code()
}
