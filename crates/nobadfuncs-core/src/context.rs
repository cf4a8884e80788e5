//! Context types for rule execution.

use std::path::{Component, Path, PathBuf};

/// Context provided to per-file rules.
///
/// Contains metadata about the file being analyzed that rules can use
/// to make context-aware decisions (e.g., skip checks in test files).
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Absolute path to the file.
    pub path: &'a Path,
    /// File contents as a string.
    pub content: &'a str,
    /// Whether this file is detected as a test file.
    pub is_test: bool,
    /// Module path from crate root (e.g., `["crate", "module", "submodule"]`).
    pub module_path: Vec<String>,
    /// Path relative to the project root.
    pub relative_path: PathBuf,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, root: &Path) -> Self {
        let is_test = Self::detect_test_file(path);
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);
        let module_path = Self::compute_module_path(&relative_path);

        Self {
            path,
            content,
            is_test,
            module_path,
            relative_path,
        }
    }

    /// Creates a context for in-memory source, with `relative_path` used
    /// both as the path and for module path derivation.
    #[must_use]
    pub fn from_source(relative_path: &'a Path, content: &'a str) -> Self {
        Self {
            path: relative_path,
            content,
            is_test: Self::detect_test_file(relative_path),
            module_path: Self::compute_module_path(relative_path),
            relative_path: relative_path.to_path_buf(),
        }
    }

    /// Detects if a file is a test file based on path conventions.
    fn detect_test_file(path: &Path) -> bool {
        for component in path.components() {
            if let Component::Normal(s) = component {
                let s = s.to_string_lossy();
                if s == "tests" || s == "test" || s == "benches" {
                    return true;
                }
            }
        }

        if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
            if file_name.ends_with("_test.rs")
                || file_name.ends_with("_tests.rs")
                || file_name.starts_with("test_")
                || file_name == "tests.rs"
            {
                return true;
            }
        }

        false
    }

    /// Computes the module path from a relative file path.
    ///
    /// Everything up to and including the last `src` directory is the crate
    /// root, so `crates/app/src/net/http.rs` becomes `crate::net::http`.
    fn compute_module_path(relative_path: &Path) -> Vec<String> {
        let parts: Vec<String> = relative_path
            .with_extension("")
            .components()
            .filter_map(|c| {
                if let Component::Normal(s) = c {
                    s.to_str().map(String::from)
                } else {
                    None
                }
            })
            .collect();

        let start = parts
            .iter()
            .rposition(|p| p == "src")
            .map_or(0, |i| i + 1);
        let mut parts = parts[start..].to_vec();

        if let Some(last) = parts.last() {
            if last == "mod" || last == "lib" || last == "main" {
                parts.pop();
            }
        }

        parts.insert(0, "crate".to_string());
        parts
    }

    /// Calculates byte offset for a given line and column.
    ///
    /// # Arguments
    ///
    /// * `line` - 1-indexed line number
    /// * `column` - 1-indexed column number, counted in characters
    ///
    /// # Returns
    ///
    /// Byte offset from the start of the file, or the file length if out of bounds.
    #[must_use]
    pub fn offset_for(&self, line: usize, column: usize) -> usize {
        if line == 0 {
            return 0;
        }

        let mut offset = 0;
        for (i, line_content) in self.content.split_inclusive('\n').enumerate() {
            if i + 1 == line {
                let within = line_content
                    .char_indices()
                    .nth(column.saturating_sub(1))
                    .map_or(line_content.len(), |(idx, _)| idx);
                return offset + within;
            }
            offset += line_content.len();
        }

        offset
    }
}
