//! Core analyzer for orchestrating rule execution.

use crate::config::Config;
use crate::context::FileContext;
use crate::references::{self, Reference};
use crate::rule::{Rule, RuleBox};
use crate::types::{LintResult, Violation};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error walking the source tree.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// Error parsing Rust source file.
    #[error("Parse error in {path}: {message}")]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Parse error message.
        message: String,
    },

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// An explicitly requested path does not exist.
    #[error("Path does not exist: {}", .0.display())]
    MissingPath(PathBuf),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    paths: Vec<PathBuf>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    include_patterns: Vec<String>,
    config: Option<Config>,
    fail_on_parse_error: bool,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Restricts analysis to a file or directory (relative to the root).
    #[must_use]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }

    /// Restricts analysis to several files or directories.
    #[must_use]
    pub fn paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.paths.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Adds a per-file rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Adds an include glob pattern.
    #[must_use]
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include_patterns.push(pattern.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets whether to fail on parse errors (default: false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory is unavailable or a glob
    /// pattern is invalid.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();

        let root = self.root.unwrap_or_else(|| config.analyzer.root.clone());
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.iter().cloned());

        let mut include_patterns = self.include_patterns;
        include_patterns.extend(config.analyzer.include.iter().cloned());

        Ok(Analyzer {
            root,
            paths: self.paths,
            rules: self.rules,
            exclude: compile_globs(&exclude_patterns)?,
            include: compile_globs(&include_patterns)?,
            respect_gitignore: config.analyzer.respect_gitignore,
            fail_on_parse_error: self.fail_on_parse_error,
        })
    }
}

fn compile_globs(patterns: &[String]) -> Result<Vec<glob::Pattern>, glob::PatternError> {
    patterns.iter().map(|p| glob::Pattern::new(p)).collect()
}

/// The main analyzer that orchestrates rule execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    paths: Vec<PathBuf>,
    rules: Vec<RuleBox>,
    exclude: Vec<glob::Pattern>,
    include: Vec<glob::Pattern>,
    respect_gitignore: bool,
    fail_on_parse_error: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Analyzes all files and returns the results.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery fails, or a file fails to parse
    /// while `fail_on_parse_error` is set.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let mut result = LintResult::new();
        let files = self.discover_files()?;

        info!("Found {} files to analyze", files.len());

        for file_path in &files {
            let Some(violations) = self.with_parsed(file_path, |ctx, ast| self.run_rules(ctx, ast))?
            else {
                continue;
            };
            result.violations.extend(violations);
            result.files_checked += 1;
        }

        result.sort();

        info!(
            "Analysis complete: {} violations in {} files",
            result.violations.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Collects every reference in the analyzed files, sorted by location.
    ///
    /// # Errors
    ///
    /// Same as [`Analyzer::analyze`].
    pub fn references(&self) -> Result<Vec<Reference>, AnalyzerError> {
        let mut all = Vec::new();
        for file_path in &self.discover_files()? {
            if let Some(refs) = self.with_parsed(file_path, references::collect)? {
                all.extend(refs);
            }
        }

        all.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.line.cmp(&b.location.line))
                .then(a.location.column.cmp(&b.location.column))
        });
        Ok(all)
    }

    fn run_rules(&self, ctx: &FileContext, ast: &syn::File) -> Vec<Violation> {
        self.rules
            .iter()
            .flat_map(|rule| rule.check(ctx, ast))
            .collect()
    }

    /// Reads and parses a file, then hands it to `f`.
    ///
    /// Returns `Ok(None)` for files that fail to parse when parse errors
    /// are tolerated.
    fn with_parsed<T>(
        &self,
        path: &Path,
        f: impl FnOnce(&FileContext, &syn::File) -> T,
    ) -> Result<Option<T>, AnalyzerError> {
        debug!("Analyzing: {}", path.display());

        let content = std::fs::read_to_string(path)?;
        let ast = match syn::parse_file(&content) {
            Ok(ast) => ast,
            Err(e) => {
                warn!("Failed to parse {}: {}", path.display(), e);
                if self.fail_on_parse_error {
                    return Err(AnalyzerError::Parse {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    });
                }
                return Ok(None);
            }
        };

        let ctx = FileContext::new(path, &content, &self.root);
        Ok(Some(f(&ctx, &ast)))
    }

    /// Discovers all Rust source files to analyze.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let starts = if self.paths.is_empty() {
            vec![self.root.clone()]
        } else {
            self.paths
                .iter()
                .map(|p| if p.is_absolute() { p.clone() } else { self.root.join(p) })
                .collect()
        };

        let mut files = Vec::new();
        for start in starts {
            if !start.exists() {
                return Err(AnalyzerError::MissingPath(start));
            }

            let mut builder = ignore::WalkBuilder::new(&start);
            builder
                .hidden(false)
                .require_git(false)
                .git_ignore(self.respect_gitignore)
                .git_global(self.respect_gitignore)
                .git_exclude(self.respect_gitignore)
                .ignore(self.respect_gitignore);

            for entry in builder.build() {
                let entry = entry?;
                let path = entry.path();

                if !entry.file_type().is_some_and(|ft| ft.is_file())
                    || path.extension().map_or(true, |ext| ext != "rs")
                {
                    continue;
                }

                if self.should_skip(path) {
                    debug!("Excluding: {}", path.display());
                    continue;
                }

                files.push(path.to_path_buf());
            }
        }

        files.sort();
        files.dedup();
        Ok(files)
    }

    /// Applies include and exclude globs to the root-relative path.
    fn should_skip(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let relative = relative.to_string_lossy().replace('\\', "/");

        if self.exclude.iter().any(|g| g.matches(&relative)) {
            return true;
        }

        !self.include.is_empty() && !self.include.iter().any(|g| g.matches(&relative))
    }
}
