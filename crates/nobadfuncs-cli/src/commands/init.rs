//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::config_resolver::PROJECT_CONFIG_NAMES;

const DEFAULT_CONFIG: &str = r#"# nobadfuncs configuration
version = 1

# Severity at which `nobadfuncs run` fails: "error", "warning" or "info"
fail_on = "error"

# Ignore references inside #[cfg(test)] modules and #[test] functions
skip_tests = false

[analyzer]
# Glob patterns (relative to the project) to exclude from analysis
exclude = [
    "**/target/**",
    "**/vendor/**",
]

# Respect .gitignore files
respect_gitignore = true

# Each entry bans a path (`std::env::*`, `**::transmute`),
# a method by name (`.unwrap`) or a macro (`std::dbg!`).
#
# Suppress a single reference with:
#   // nobadfuncs: allow(std::process::exit) reason="..."

[[bad-funcs]]
path = "std::process::exit"
message = "return an ExitCode from main instead"

[[bad-funcs]]
path = "std::dbg!"
message = "remove debugging output before committing"
severity = "warning"

# [[bad-funcs]]
# path = ".unwrap"
# message = "propagate the error with `?`"
# doc = "CONTRIBUTING.md#errors"
"#;

/// Writes a starter config into `project_dir`.
pub fn run(project_dir: &Path, force: bool) -> Result<()> {
    let name = PROJECT_CONFIG_NAMES[0];
    let config_path = project_dir.join(name);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Created {}", config_path.display());
    println!("\nNext steps:");
    println!("  1. Edit {name} to list your banned functions");
    println!("  2. Run: nobadfuncs run");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nobadfuncs_core::Config;

    #[test]
    fn starter_config_is_valid() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.bad_func_set().unwrap().len(), 2);
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), false).unwrap();
        assert!(run(dir.path(), false).is_err());

        std::fs::write(dir.path().join("nobadfuncs.toml"), "# mine").unwrap();
        run(dir.path(), true).unwrap();
        let written = std::fs::read_to_string(dir.path().join("nobadfuncs.toml")).unwrap();
        assert_eq!(written, DEFAULT_CONFIG);
    }
}
