//! Configuration types for nobadfuncs.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::loader::{self, LoadError};
use crate::model::BadFuncSet;
use crate::types::Severity;

/// Schema version written by this release.
pub const CURRENT_VERSION: u32 = 1;

const KNOWN_KEYS: &[&str] = &["version", "fail_on", "skip_tests", "analyzer", "bad-funcs"];

/// Top-level configuration for nobadfuncs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Schema version (missing means current).
    #[serde(default = "current_version")]
    pub version: u32,

    /// Severity threshold for a failing check (default: "error").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<Severity>,

    /// Ignore references inside test code.
    #[serde(default)]
    pub skip_tests: bool,

    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Banned functions.
    #[serde(rename = "bad-funcs", default)]
    pub bad_funcs: Vec<BadFuncEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            fail_on: None,
            skip_tests: false,
            analyzer: AnalyzerConfig::default(),
            bad_funcs: Vec::new(),
        }
    }
}

/// Version 0 keeps `exclude` at the top level and `bad-funcs` as a table.
pub(crate) fn is_legacy_layout(table: &toml::Table) -> bool {
    table.contains_key("exclude") || table.get("bad-funcs").is_some_and(toml::Value::is_table)
}

impl Config {
    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid, uses the legacy layout
    /// or declares an unsupported version.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;

        if is_legacy_layout(&table) {
            return Err(ConfigError::Legacy);
        }

        for key in table.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                tracing::warn!(key = %key, "ignoring unknown configuration key");
            }
        }

        let config: Self =
            toml::Value::Table(table)
                .try_into()
                .map_err(|e: toml::de::Error| ConfigError::Parse {
                    message: e.to_string(),
                })?;

        if config.version != CURRENT_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
            });
        }

        Ok(config)
    }

    /// Validates the `[[bad-funcs]]` entries.
    ///
    /// # Errors
    ///
    /// Returns an error if any pattern or severity is invalid, or a
    /// pattern is listed twice.
    pub fn bad_func_set(&self) -> Result<BadFuncSet, LoadError> {
        loader::load(&self.bad_funcs)
    }

    /// Returns the severity at which the check fails.
    #[must_use]
    pub fn fail_on_severity(&self) -> Severity {
        self.fail_on.unwrap_or(Severity::Error)
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize {
            message: e.to_string(),
        })
    }
}

fn current_version() -> u32 {
    CURRENT_VERSION
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Root directory to analyze (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns to exclude from analysis.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Glob patterns to include (if empty, all *.rs files).
    #[serde(default)]
    pub include: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: default_exclude(),
            include: Vec::new(),
            respect_gitignore: true,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_exclude() -> Vec<String> {
    vec!["**/target/**".to_string(), "**/vendor/**".to_string()]
}

fn default_true() -> bool {
    true
}

/// One `[[bad-funcs]]` entry as written in TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadFuncEntry {
    /// Pattern (`std::process::exit`, `.unwrap`, `std::dbg!`).
    pub path: String,
    /// Violation message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Severity (default: "error").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    /// Document reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// The config uses the unversioned layout (`[bad-funcs]` table or
    /// top-level `exclude`).
    #[error("config uses the legacy unversioned layout, run `upgrade-config` first")]
    Legacy,

    /// The config declares a version this release cannot read.
    #[error("unsupported config version {found}, expected {CURRENT_VERSION}")]
    UnsupportedVersion {
        /// Declared version.
        found: u32,
    },

    /// Serialization error.
    #[error("Failed to serialize config: {message}")]
    Serialize {
        /// Serialization error message.
        message: String,
    },
}
