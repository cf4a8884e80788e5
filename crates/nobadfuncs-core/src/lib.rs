//! # nobadfuncs-core
//!
//! Core framework for finding references to banned functions, based on
//! `syn` AST analysis.
//!
//! This crate provides:
//!
//! - [`references::collect`] for extracting resolved call, path, method
//!   and macro references from a parsed file
//! - [`BadFuncSet`] as the validated model of banned patterns
//! - [`Config`] with its versioned TOML schema and [`upgrade_config`]
//! - [`Rule`] trait for per-file AST-based rules
//! - [`Analyzer`] for orchestrating rule execution
//! - [`Violation`] for representing findings
//!
//! ## Example
//!
//! ```ignore
//! use nobadfuncs_core::{Analyzer, Config};
//!
//! let config = Config::parse(&std::fs::read_to_string("nobadfuncs.toml")?)?;
//! let analyzer = Analyzer::builder()
//!     .config(config)
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod loader;
mod model;
mod rule;
mod types;
mod upgrade;

/// Symbol reference extraction.
pub mod references;

/// Utility modules for rule implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{AnalyzerConfig, BadFuncEntry, Config, ConfigError, CURRENT_VERSION};
pub use context::FileContext;
pub use loader::LoadError;
pub use model::{BadFunc, BadFuncPattern, BadFuncSet, ModelError, PatternKind};
pub use references::{Reference, ReferenceKind};
pub use rule::{Rule, RuleBox};
pub use types::{LintResult, Location, Severity, Suggestion, Violation, ViolationDiagnostic};
pub use upgrade::{upgrade_config, UpgradeError};
pub use utils::allowance::AllowCheck;
