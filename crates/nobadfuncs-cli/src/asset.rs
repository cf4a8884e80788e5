//! Checker asset root command.
//!
//! Usage:
//! ```bash
//! nobadfuncs run [PATHS]... [--format text|json|compact|pretty] [--all]
//! nobadfuncs verify-config
//! nobadfuncs upgrade-config [FILE] [--in-place]
//! nobadfuncs init
//! nobadfuncs name | priority
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use nobadfuncs_checker::{CheckRequest, CheckerBox, Creator, UpgradeError};

use crate::commands;
use crate::commands::output::OutputFormat;
use crate::config_resolver::{self, ConfigSource};

/// Signature of a config upgrade function.
pub type UpgradeFn = fn(&[u8]) -> Result<Vec<u8>, UpgradeError>;

#[derive(Parser, Debug)]
#[command(version)]
struct AssetCli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Project directory to check
    #[arg(long, global = true, default_value = ".")]
    project_dir: PathBuf,

    #[command(subcommand)]
    command: AssetCommand,
}

#[derive(Subcommand, Debug)]
enum AssetCommand {
    /// Print the checker name
    Name,

    /// Print the checker priority
    Priority,

    /// Validate the resolved configuration
    VerifyConfig,

    /// Upgrade a configuration file to the current schema
    UpgradeConfig {
        /// Config file to upgrade (default: stdin)
        file: Option<PathBuf>,

        /// Rewrite FILE instead of printing the result
        #[arg(long, requires = "file")]
        in_place: bool,
    },

    /// Run the check
    Run {
        /// Files or directories to check (default: the whole project)
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Print every reference instead of checking
        #[arg(long)]
        all: bool,
    },

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Root command built from a checker factory, a config upgrade function
/// and a description.
pub struct AssetRootCmd {
    creator: Creator,
    upgrade: UpgradeFn,
    description: String,
}

impl AssetRootCmd {
    /// Creates the root command.
    #[must_use]
    pub fn new(creator: Creator, upgrade: UpgradeFn, description: impl Into<String>) -> Self {
        Self {
            creator,
            upgrade,
            description: description.into(),
        }
    }

    /// Returns the command description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Applies the wired upgrade function.
    ///
    /// # Errors
    ///
    /// Returns the upgrade function's error.
    pub fn upgrade(&self, config: &[u8]) -> Result<Vec<u8>, UpgradeError> {
        (self.upgrade)(config)
    }

    /// Builds the clap command, named after the checker.
    #[must_use]
    pub fn command(&self) -> clap::Command {
        AssetCli::command()
            .name(self.creator.name())
            .about(self.description().to_string())
    }

    /// Runs the sub-command selected by `matches`.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails, including a check that finds
    /// violations at or above the configured threshold.
    pub fn run_matches(&self, matches: &ArgMatches) -> Result<()> {
        let cli = AssetCli::from_arg_matches(matches)?;
        crate::init_tracing(cli.verbose, "info");

        match cli.command {
            AssetCommand::Name => {
                println!("{}", self.creator.name());
                Ok(())
            }
            AssetCommand::Priority => {
                println!("{}", self.creator.priority());
                Ok(())
            }
            AssetCommand::VerifyConfig => {
                self.load_checker(&cli.project_dir, cli.config.as_deref())?;
                println!("config is valid");
                Ok(())
            }
            AssetCommand::UpgradeConfig { file, in_place } => {
                commands::upgrade_config::run(self.upgrade, file.as_deref(), in_place)
            }
            AssetCommand::Run {
                paths,
                format,
                exclude,
                all,
            } => {
                let checker = self.load_checker(&cli.project_dir, cli.config.as_deref())?;
                let request = CheckRequest::new(cli.project_dir.clone())
                    .with_paths(paths)
                    .with_excludes(exclude);
                commands::run::run(checker.as_ref(), &request, format, all)
            }
            AssetCommand::Init { force } => commands::init::run(&cli.project_dir, force),
        }
    }

    /// Resolves, upgrades and validates the configuration.
    fn load_checker(
        &self,
        project_dir: &std::path::Path,
        explicit: Option<&std::path::Path>,
    ) -> Result<CheckerBox> {
        let source = config_resolver::resolve(project_dir, explicit);
        let bytes = match &source {
            ConfigSource::Default => Vec::new(),
            other => {
                // Invariant: non-Default variants always have a path
                let p = other.path().context("resolved config has no path")?;
                if source.is_global() {
                    tracing::info!("Using global config: {}", p.display());
                }
                std::fs::read(p)
                    .with_context(|| format!("Failed to read config: {}", p.display()))?
            }
        };

        let upgraded = self
            .upgrade(&bytes)
            .with_context(|| format!("Failed to upgrade config from {source}"))?;
        self.creator
            .create(&upgraded)
            .with_context(|| format!("Invalid config from {source}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nobadfuncs_checker::{creator, upgrade_config};
    use std::fs;

    fn root() -> AssetRootCmd {
        AssetRootCmd::new(creator::nobadfuncs(), upgrade_config, "test description")
    }

    fn run(args: &[&str]) -> Result<()> {
        let root = root();
        let matches = root.command().try_get_matches_from(args)?;
        root.run_matches(&matches)
    }

    #[test]
    fn command_is_named_after_the_checker() {
        let cmd = root().command();
        assert_eq!(cmd.get_name(), "nobadfuncs");
        assert_eq!(
            cmd.get_about().map(ToString::to_string).as_deref(),
            Some("test description")
        );
        cmd.debug_assert();
    }

    #[test]
    fn verify_config_checks_legacy_and_current_configs() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().display().to_string();
        fs::write(
            dir.path().join("nobadfuncs.toml"),
            "[bad-funcs]\n\"std::process::exit\" = \"no\"\n",
        )
        .unwrap();
        run(&["nobadfuncs", "verify-config", "--project-dir", &project]).unwrap();

        fs::write(dir.path().join("nobadfuncs.toml"), "[[bad-funcs]]\npath = \"::\"\n").unwrap();
        let err = run(&["nobadfuncs", "verify-config", "--project-dir", &project]).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid config"), "{err:#}");
    }

    #[test]
    fn run_fails_at_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().display().to_string();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(
            dir.path().join("src/lib.rs"),
            "pub fn f(x: Option<u8>) -> u8 { x.unwrap() }\n",
        )
        .unwrap();
        let config = dir.path().join("custom.toml");
        let config_arg = config.display().to_string();

        fs::write(&config, "[[bad-funcs]]\npath = \".unwrap\"\nseverity = \"warning\"\n")
            .unwrap();
        let args = ["nobadfuncs", "run", "--project-dir", &project, "--config", &config_arg];
        run(&args).unwrap();

        fs::write(
            &config,
            "fail_on = \"warning\"\n[[bad-funcs]]\npath = \".unwrap\"\nseverity = \"warning\"\n",
        )
        .unwrap();
        assert!(run(&args).is_err());
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let err = run(&["nobadfuncs", "verify-config", "--config", "/nonexistent/x.toml"])
            .unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read config"));
    }

    #[test]
    fn wired_upgrade_function_is_used() {
        let legacy = b"[bad-funcs]\n\"a::b\" = \"no\"\n";
        assert_eq!(
            root().upgrade(legacy).unwrap(),
            upgrade_config(legacy).unwrap()
        );
    }
}
