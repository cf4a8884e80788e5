//! Checker factory: turns configuration bytes into a runnable checker.

use std::path::PathBuf;
use std::sync::Arc;

use nobadfuncs_core::references::Reference;
use nobadfuncs_core::{
    Analyzer, AnalyzerError, BadFuncSet, Config, ConfigError, LintResult, LoadError, Severity,
};
use tracing::debug;

use crate::bad_funcs::NoBadFuncs;

/// Name of the bundled checker.
pub const CHECKER_NAME: &str = "nobadfuncs";

/// Priority of the bundled checker.
pub const CHECKER_PRIORITY: i32 = 0;

/// Errors from [`Creator::create`].
#[derive(Debug, thiserror::Error)]
pub enum CreateError {
    /// The configuration is not UTF-8.
    #[error("config is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// The configuration does not parse.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The bad-func entries do not validate.
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Errors from running a checker.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// Analysis failed.
    #[error(transparent)]
    Analyzer(#[from] AnalyzerError),
}

/// What to check.
#[derive(Debug, Clone)]
pub struct CheckRequest {
    /// Project directory; the configured analyzer root is relative to it.
    pub project_dir: PathBuf,
    /// Files or directories to restrict the scan to (empty: whole root).
    pub paths: Vec<PathBuf>,
    /// Exclude globs on top of the configured ones.
    pub exclude: Vec<String>,
}

impl CheckRequest {
    /// Creates a request for the whole project.
    #[must_use]
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            paths: Vec::new(),
            exclude: Vec::new(),
        }
    }

    /// Restricts the scan to the given paths.
    #[must_use]
    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.paths = paths;
        self
    }

    /// Adds exclude globs.
    #[must_use]
    pub fn with_excludes(mut self, exclude: Vec<String>) -> Self {
        self.exclude.extend(exclude);
        self
    }
}

/// A pluggable analysis unit.
pub trait Checker: Send + Sync {
    /// Returns the checker name.
    fn name(&self) -> &str;

    /// Returns the ordering priority among checkers (lower runs first).
    fn priority(&self) -> i32;

    /// Returns the severity at which a check fails.
    fn fail_on(&self) -> Severity;

    /// Runs the check.
    ///
    /// # Errors
    ///
    /// Returns an error if the analysis itself fails.
    fn check(&self, request: &CheckRequest) -> Result<LintResult, CheckError>;

    /// Lists every reference the check would inspect.
    ///
    /// # Errors
    ///
    /// Returns an error if the analysis itself fails.
    fn references(&self, request: &CheckRequest) -> Result<Vec<Reference>, CheckError>;
}

/// Boxed checker.
pub type CheckerBox = Box<dyn Checker>;

/// Builds a checker from serialized configuration.
#[derive(Clone, Copy)]
pub struct Creator {
    name: &'static str,
    priority: i32,
    factory: fn(&[u8]) -> Result<CheckerBox, CreateError>,
}

impl Creator {
    /// Creates a factory.
    #[must_use]
    pub const fn new(
        name: &'static str,
        priority: i32,
        factory: fn(&[u8]) -> Result<CheckerBox, CreateError>,
    ) -> Self {
        Self {
            name,
            priority,
            factory,
        }
    }

    /// Returns the checker name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the checker priority.
    #[must_use]
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Builds a checker from current-schema configuration bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn create(&self, config: &[u8]) -> Result<CheckerBox, CreateError> {
        (self.factory)(config)
    }
}

impl std::fmt::Debug for Creator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Creator")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// Returns the factory for the `nobadfuncs` checker.
#[must_use]
pub fn nobadfuncs() -> Creator {
    Creator::new(CHECKER_NAME, CHECKER_PRIORITY, create_bad_funcs_checker)
}

fn create_bad_funcs_checker(bytes: &[u8]) -> Result<CheckerBox, CreateError> {
    let text = std::str::from_utf8(bytes)?;
    let config = if text.trim().is_empty() {
        Config::default()
    } else {
        Config::parse(text)?
    };
    Ok(Box::new(BadFuncsChecker::new(config)?))
}

/// The `nobadfuncs` checker.
#[derive(Debug, Clone)]
pub struct BadFuncsChecker {
    config: Config,
    bad_funcs: Arc<BadFuncSet>,
}

impl BadFuncsChecker {
    /// Validates `config` and builds the checker.
    ///
    /// # Errors
    ///
    /// Returns an error if a bad-func entry is invalid.
    pub fn new(config: Config) -> Result<Self, CreateError> {
        let bad_funcs = Arc::new(config.bad_func_set()?);
        debug!(count = bad_funcs.len(), "loaded bad funcs");
        Ok(Self { config, bad_funcs })
    }

    fn analyzer(&self, request: &CheckRequest, with_rule: bool) -> Result<Analyzer, CheckError> {
        let mut builder = Analyzer::builder()
            .root(request.project_dir.join(&self.config.analyzer.root))
            .config(self.config.clone())
            .paths(request.paths.iter().cloned())
            .excludes(request.exclude.iter().cloned());

        if with_rule {
            builder = builder.rule(
                NoBadFuncs::new(Arc::clone(&self.bad_funcs)).skip_tests(self.config.skip_tests),
            );
        }

        Ok(builder.build()?)
    }
}

impl Checker for BadFuncsChecker {
    fn name(&self) -> &str {
        CHECKER_NAME
    }

    fn priority(&self) -> i32 {
        CHECKER_PRIORITY
    }

    fn fail_on(&self) -> Severity {
        self.config.fail_on_severity()
    }

    fn check(&self, request: &CheckRequest) -> Result<LintResult, CheckError> {
        Ok(self.analyzer(request, true)?.analyze()?)
    }

    fn references(&self, request: &CheckRequest) -> Result<Vec<Reference>, CheckError> {
        Ok(self.analyzer(request, false)?.references()?)
    }
}
