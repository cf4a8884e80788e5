//! Validated domain model for banned functions.
//!
//! This module has no serde or I/O dependencies. All invariants are
//! enforced at construction time via validated newtypes.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::references::{Reference, ReferenceKind};
use crate::types::Severity;
use crate::utils::path_matches;

// ────────────────────────────────────────────
// Patterns
// ────────────────────────────────────────────

/// What a [`BadFuncPattern`] is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    /// Function paths, in call or value position.
    Path,
    /// Method calls by name.
    Method,
    /// Macro invocations.
    Macro,
}

/// A validated bad-function pattern.
///
/// Accepted forms:
/// - `std::process::exit`, `std::env::*`, `**::transmute` (paths)
/// - `.unwrap` or `.unwrap()` (methods, matched by name)
/// - `std::println!` or `**::dbg!` (macros)
///
/// Equality ignores spelling: `.unwrap` equals `.unwrap()` and `::a::b`
/// equals `a::b`.
#[derive(Debug, Clone)]
pub struct BadFuncPattern {
    raw: String,
    kind: PatternKind,
    body: String,
}

impl BadFuncPattern {
    /// Parses and validates a pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is empty or malformed.
    pub fn new(pattern: &str) -> Result<Self, ModelError> {
        let raw = pattern.trim();
        if raw.is_empty() {
            return Err(ModelError::EmptyPattern);
        }

        if let Some(method) = raw.strip_prefix('.') {
            let name = method.strip_suffix("()").unwrap_or(method);
            if !is_identifier(name) {
                return Err(ModelError::InvalidMethodName {
                    pattern: raw.to_string(),
                });
            }
            return Ok(Self {
                raw: raw.to_string(),
                kind: PatternKind::Method,
                body: name.to_string(),
            });
        }

        let (kind, path) = match raw.strip_suffix('!') {
            Some(path) => (PatternKind::Macro, path),
            None => (PatternKind::Path, raw.strip_suffix("()").unwrap_or(raw)),
        };
        let path = path.strip_prefix("::").unwrap_or(path);

        for segment in path.split("::") {
            if !(segment == "*" || segment == "**" || is_identifier(segment)) {
                return Err(ModelError::InvalidSegment {
                    pattern: raw.to_string(),
                    segment: segment.to_string(),
                });
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            kind,
            body: path.to_string(),
        })
    }

    /// Returns the pattern as written (trimmed).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns what this pattern matches against.
    #[must_use]
    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    /// Tests whether a reference matches this pattern.
    #[must_use]
    pub fn matches(&self, reference: &Reference) -> bool {
        match (self.kind, reference.kind) {
            (PatternKind::Path, ReferenceKind::Call | ReferenceKind::Path) => {
                path_matches(&reference.path, &self.body)
            }
            (PatternKind::Method, ReferenceKind::Method) => {
                reference.path.strip_prefix('.') == Some(self.body.as_str())
            }
            (PatternKind::Macro, ReferenceKind::Macro) => reference
                .path
                .strip_suffix('!')
                .is_some_and(|path| path_matches(path, &self.body)),
            _ => false,
        }
    }
}

impl PartialEq for BadFuncPattern {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.body == other.body
    }
}

impl Eq for BadFuncPattern {}

impl Hash for BadFuncPattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.body.hash(state);
    }
}

impl fmt::Display for BadFuncPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

fn is_identifier(s: &str) -> bool {
    let s = s.strip_prefix("r#").unwrap_or(s);
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

// ────────────────────────────────────────────
// Entities
// ────────────────────────────────────────────

/// A banned function: a pattern plus how to report it.
#[derive(Debug, Clone)]
pub struct BadFunc {
    pattern: BadFuncPattern,
    message: Option<String>,
    severity: Severity,
    doc_ref: Option<String>,
}

impl BadFunc {
    /// Creates a new bad function entry. Empty messages are treated as absent.
    #[must_use]
    pub fn new(
        pattern: BadFuncPattern,
        message: Option<String>,
        severity: Severity,
        doc_ref: Option<String>,
    ) -> Self {
        Self {
            pattern,
            message: message.filter(|m| !m.trim().is_empty()),
            severity,
            doc_ref,
        }
    }

    /// Returns the pattern.
    #[must_use]
    pub fn pattern(&self) -> &BadFuncPattern {
        &self.pattern
    }

    /// Returns the configured message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the message to report for `reference`.
    #[must_use]
    pub fn message_for(&self, reference: &Reference) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| format!("`{}` is a banned function", reference.path))
    }

    /// Returns the severity.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the document reference, if any.
    #[must_use]
    pub fn doc_ref(&self) -> Option<&str> {
        self.doc_ref.as_deref()
    }
}

/// An ordered, duplicate-free set of bad functions.
#[derive(Debug, Clone, Default)]
pub struct BadFuncSet {
    entries: Vec<BadFunc>,
}

impl BadFuncSet {
    /// Creates a validated set.
    ///
    /// # Errors
    ///
    /// Returns every duplicated pattern at once.
    pub fn new(entries: Vec<BadFunc>) -> Result<Self, Vec<ModelError>> {
        let mut seen = HashSet::new();
        let errors: Vec<ModelError> = entries
            .iter()
            .filter(|e| !seen.insert(e.pattern.clone()))
            .map(|e| ModelError::DuplicatePattern {
                pattern: e.pattern.as_str().to_string(),
            })
            .collect();

        if errors.is_empty() {
            Ok(Self { entries })
        } else {
            Err(errors)
        }
    }

    /// Returns true if no bad functions are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of configured bad functions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over the entries in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &BadFunc> {
        self.entries.iter()
    }

    /// Returns the first entry whose pattern matches `reference`.
    #[must_use]
    pub fn find(&self, reference: &Reference) -> Option<&BadFunc> {
        self.entries.iter().find(|e| e.pattern.matches(reference))
    }
}

// ────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────

/// Validation errors for the bad-function model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Pattern is empty.
    #[error("pattern must not be empty")]
    EmptyPattern,

    /// A path segment is not an identifier, `*` or `**`.
    #[error("invalid segment `{segment}` in pattern `{pattern}`")]
    InvalidSegment {
        /// The whole pattern.
        pattern: String,
        /// The offending segment.
        segment: String,
    },

    /// A method pattern does not name a method.
    #[error("invalid method pattern `{pattern}`, expected `.name`")]
    InvalidMethodName {
        /// The whole pattern.
        pattern: String,
    },

    /// The same pattern is configured twice.
    #[error("duplicate pattern `{pattern}`")]
    DuplicatePattern {
        /// The duplicated pattern.
        pattern: String,
    },
}
