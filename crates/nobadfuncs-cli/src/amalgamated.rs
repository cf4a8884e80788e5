//! Amalgamated binary dispatch.
//!
//! One binary carries both the checker asset commands and the raw tools
//! they wrap. A first argument of the form `__<name>` naming a registered
//! tool runs that tool; anything else goes to check mode.
//!
//! ```text
//! nobadfuncs __nobadfuncs --all src/   → raw tool, args [nobadfuncs, --all, src/]
//! nobadfuncs run src/                  → check mode, args unchanged
//! ```

use std::collections::BTreeMap;

/// Prefix that marks a bundled tool invocation.
pub const DEFAULT_PREFIX: &str = "__";

/// A tool bundled into the binary.
pub trait SubTool {
    /// Runs the tool with its own argument vector and returns its exit code.
    fn run(&self, args: Vec<String>) -> i32;
}

impl<F> SubTool for F
where
    F: Fn(Vec<String>) -> i32,
{
    fn run(&self, args: Vec<String>) -> i32 {
        self(args)
    }
}

/// Registry of bundled tools, keyed by name.
pub struct CmdLibrary {
    prefix: String,
    tools: BTreeMap<String, Box<dyn SubTool>>,
}

impl Default for CmdLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl CmdLibrary {
    /// Creates an empty registry using [`DEFAULT_PREFIX`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            tools: BTreeMap::new(),
        }
    }

    /// Registers a tool under `name`.
    #[must_use]
    pub fn with_tool(mut self, name: impl Into<String>, tool: impl SubTool + 'static) -> Self {
        self.tools.insert(name.into(), Box::new(tool));
        self
    }

    /// Returns the registered tool names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    /// Finds the tool selected by `args[1]` and the arguments it should see.
    ///
    /// The tool receives the program name followed by everything after the
    /// selector.
    #[must_use]
    pub fn resolve(&self, args: &[String]) -> Option<(&dyn SubTool, Vec<String>)> {
        let selector = args.get(1)?;
        let name = selector.strip_prefix(&self.prefix)?;
        let tool = self.tools.get(name)?;

        let tool_args = args
            .first()
            .into_iter()
            .chain(&args[2..])
            .cloned()
            .collect();
        Some((tool.as_ref(), tool_args))
    }
}

/// Runs a bundled tool if `args` select one, otherwise `check_main`.
///
/// Exactly one of the two runs, and its exit code is returned as is.
pub fn run_app(
    args: Vec<String>,
    library: &CmdLibrary,
    check_main: impl FnOnce(Vec<String>) -> i32,
) -> i32 {
    if let Some((tool, tool_args)) = library.resolve(&args) {
        tracing::debug!(tool = %args[1], "dispatching to bundled tool");
        return tool.run(tool_args);
    }
    if let Some(selector) = args.get(1).filter(|a| a.starts_with(&library.prefix)) {
        let known: Vec<_> = library.names().collect();
        tracing::debug!("{selector} is not a bundled tool (known: {known:?}), running check mode");
    }
    check_main(args)
}

/// The registry used by the `nobadfuncs` binary.
#[must_use]
pub fn library() -> CmdLibrary {
    CmdLibrary::new().with_tool(nobadfuncs_checker::creator::CHECKER_NAME, crate::tool::run)
}
