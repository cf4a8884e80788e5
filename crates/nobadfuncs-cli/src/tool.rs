//! The raw `nobadfuncs` tool, reached as `nobadfuncs __nobadfuncs`.
//!
//! Takes its bad funcs inline as JSON instead of reading a config file:
//!
//! ```bash
//! nobadfuncs __nobadfuncs --config '{"bad-funcs":{"std::process::exit":"use ExitCode"}}' src/
//! nobadfuncs __nobadfuncs --all src/
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use nobadfuncs_checker::{BadFuncsChecker, CheckRequest, Checker};
use nobadfuncs_core::{BadFuncEntry, Config};
use serde::Deserialize;

use crate::execute::report_clap_error;

/// Reports references to banned functions
#[derive(Parser, Debug)]
#[command(name = "nobadfuncs")]
struct RawArgs {
    /// JSON config: {"bad-funcs": {"<pattern>": "<message>"}}
    #[arg(long)]
    config: Option<String>,

    /// Print every reference instead of checking
    #[arg(long)]
    all: bool,

    /// Project directory that paths are relative to
    #[arg(long, default_value = ".")]
    project_dir: PathBuf,

    /// Files or directories to check (default: the whole project)
    paths: Vec<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(rename = "bad-funcs", default)]
    bad_funcs: BTreeMap<String, String>,
}

impl RawConfig {
    fn into_config(self) -> Config {
        let bad_funcs = self
            .bad_funcs
            .into_iter()
            .map(|(path, message)| BadFuncEntry {
                path,
                message: Some(message),
                severity: None,
                doc: None,
            })
            .collect();
        Config {
            bad_funcs,
            ..Config::default()
        }
    }
}

/// Runs the raw tool and returns its exit code.
///
/// Exits 1 when a banned function is referenced, 0 otherwise.
pub fn run(args: Vec<String>) -> i32 {
    let args = match RawArgs::try_parse_from(args) {
        Ok(args) => args,
        Err(e) => return report_clap_error(&e),
    };
    crate::init_tracing(false, "warn");

    match execute(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            1
        }
    }
}

fn execute(args: RawArgs) -> Result<i32> {
    let raw: RawConfig = match args.config.as_deref() {
        Some(json) => serde_json::from_str(json).context("Invalid --config JSON")?,
        None => RawConfig::default(),
    };
    let checker =
        BadFuncsChecker::new(raw.into_config()).context("Invalid bad-funcs configuration")?;
    let request = CheckRequest::new(args.project_dir).with_paths(args.paths);

    if args.all {
        for reference in checker.references(&request)? {
            println!("{reference}");
        }
        return Ok(0);
    }

    let result = checker.check(&request)?;
    for violation in &result.violations {
        println!("{violation}");
    }
    Ok(i32::from(!result.violations.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(
            dir.path().join("src/main.rs"),
            "fn main() { std::process::exit(0); }\n",
        )
        .unwrap();
        dir
    }

    fn raw(dir: &tempfile::TempDir, extra: &[&str]) -> i32 {
        let mut args = vec![
            "nobadfuncs".to_string(),
            "--project-dir".to_string(),
            dir.path().display().to_string(),
        ];
        args.extend(extra.iter().map(ToString::to_string));
        run(args)
    }

    #[test]
    fn violations_exit_one() {
        let dir = project();
        let config = r#"{"bad-funcs":{"std::process::exit":"use ExitCode"}}"#;
        assert_eq!(raw(&dir, &["--config", config]), 1);
    }

    #[test]
    fn clean_projects_exit_zero() {
        let dir = project();
        assert_eq!(raw(&dir, &[]), 0);
        let config = r#"{"bad-funcs":{"std::process::abort":"no"}}"#;
        assert_eq!(raw(&dir, &["--config", config, "src"]), 0);
    }

    #[test]
    fn all_mode_exits_zero() {
        let dir = project();
        let config = r#"{"bad-funcs":{"std::process::exit":"use ExitCode"}}"#;
        assert_eq!(raw(&dir, &["--all", "--config", config]), 0);
    }

    #[test]
    fn bad_input_is_an_error() {
        let dir = project();
        assert_eq!(raw(&dir, &["--config", "{not json"]), 1);
        assert_eq!(raw(&dir, &["--config", r#"{"bad-funcs":{"a::":"x"}}"#]), 1);
        assert_eq!(raw(&dir, &["--config", r#"{"other":{}}"#]), 1);
        assert_eq!(raw(&dir, &["--no-such-flag"]), 2);
    }

    #[test]
    fn json_config_becomes_entries() {
        let raw: RawConfig =
            serde_json::from_str(r#"{"bad-funcs":{"b::c":"two","a":"one"}}"#).unwrap();
        let config = raw.into_config();
        let paths: Vec<_> = config.bad_funcs.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["a", "b::c"]);
    }
}
