//! nobadfuncs CLI tool.
//!
//! Usage:
//! ```bash
//! nobadfuncs run [PATHS]...
//! nobadfuncs verify-config
//! nobadfuncs upgrade-config [FILE]
//! nobadfuncs __nobadfuncs --config '{"bad-funcs":{...}}' [PATHS]...
//! ```
//!
//! A first argument of `__<tool>` runs a bundled tool; anything else is
//! handled by the checker commands.

use std::ffi::OsString;

use nobadfuncs_checker::{creator, upgrade_config};
use tracing_subscriber::EnvFilter;

mod amalgamated;
mod asset;
mod commands;
mod config_resolver;
mod execute;
mod tool;

use asset::AssetRootCmd;

const DESCRIPTION: &str = "run nobadfuncs check";

/// Exit code for arguments that cannot be dispatched, matching clap's.
const USAGE_EXIT_CODE: i32 = 2;

fn main() {
    let args = match utf8_args(std::env::args_os()) {
        Ok(args) => args,
        Err(bad) => {
            eprintln!("error: invalid UTF-8 in argument {bad:?}");
            std::process::exit(USAGE_EXIT_CODE);
        }
    };
    std::process::exit(amalgamated::run_app(
        args,
        &amalgamated::library(),
        check_main,
    ));
}

/// Converts the arguments without altering them, returning the first one
/// that is not valid UTF-8.
fn utf8_args(args: impl IntoIterator<Item = OsString>) -> Result<Vec<String>, OsString> {
    args.into_iter().map(OsString::into_string).collect()
}

fn check_main(args: Vec<String>) -> i32 {
    execute::execute_with_default_params(&root_cmd(), args)
}

fn root_cmd() -> AssetRootCmd {
    AssetRootCmd::new(creator::nobadfuncs(), upgrade_config, DESCRIPTION)
}

/// Installs the stderr subscriber. `RUST_LOG` overrides `default_level`
/// unless `verbose` is set.
pub fn init_tracing(verbose: bool, default_level: &str) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    // Already installed when a test runs several commands.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
