//! # nobadfuncs-checker
//!
//! The `nobadfuncs` checker: reports references to configured banned
//! functions, methods and macros.
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | NBF001 | `bad-funcs` | Forbids references to configured banned functions |
//!
//! ## Usage
//!
//! ```ignore
//! use nobadfuncs_checker::{creator, CheckRequest};
//!
//! let config = std::fs::read("nobadfuncs.toml")?;
//! let config = nobadfuncs_checker::upgrade_config(&config)?;
//! let checker = creator::nobadfuncs().create(&config)?;
//! let result = checker.check(&CheckRequest::new("."))?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod bad_funcs;
pub mod creator;

pub use bad_funcs::{NoBadFuncs, CODE, NAME};
pub use creator::{
    BadFuncsChecker, CheckError, CheckRequest, Checker, CheckerBox, CreateError, Creator,
};

/// Re-export core types for convenience.
pub use nobadfuncs_core::{upgrade_config, Rule, Severity, UpgradeError, Violation};
