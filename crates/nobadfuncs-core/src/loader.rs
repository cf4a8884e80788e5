//! Config entries → validated model conversion.

use crate::config::BadFuncEntry;
use crate::model::{BadFunc, BadFuncPattern, BadFuncSet, ModelError};
use crate::types::Severity;

/// Errors during entry → model conversion.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A field-level validation error.
    #[error("{context}: {source}")]
    Validation {
        /// Where the error occurred (e.g., "bad-funcs[0].path").
        context: String,
        /// The underlying model error.
        source: ModelError,
    },

    /// Unknown severity string.
    #[error("{context}: unknown severity `{value}`, expected: error, warning, info")]
    UnknownSeverity {
        /// Where the error occurred.
        context: String,
        /// The invalid value.
        value: String,
    },

    /// Errors from whole-set validation.
    #[error("configuration validation errors:\n{}", format_errors(.0))]
    CrossRef(Vec<ModelError>),
}

fn format_errors(errors: &[ModelError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Converts `[[bad-funcs]]` entries to a validated `BadFuncSet`.
///
/// # Errors
///
/// Returns the first field error, or every duplicate pattern at once.
pub fn load(entries: &[BadFuncEntry]) -> Result<BadFuncSet, LoadError> {
    let bad_funcs = entries
        .iter()
        .enumerate()
        .map(|(i, e)| convert_entry(e, i))
        .collect::<Result<Vec<_>, _>>()?;

    BadFuncSet::new(bad_funcs).map_err(LoadError::CrossRef)
}

fn convert_entry(entry: &BadFuncEntry, index: usize) -> Result<BadFunc, LoadError> {
    let ctx = format!("bad-funcs[{index}]");

    let pattern = BadFuncPattern::new(&entry.path).map_err(|e| LoadError::Validation {
        context: format!("{ctx}.path"),
        source: e,
    })?;

    let severity = match entry.severity.as_deref() {
        None => Severity::Error,
        Some(s) => Severity::from_name(s).ok_or_else(|| LoadError::UnknownSeverity {
            context: format!("{ctx}.severity"),
            value: s.to_string(),
        })?,
    };

    Ok(BadFunc::new(
        pattern,
        entry.message.clone(),
        severity,
        entry.doc.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str) -> BadFuncEntry {
        BadFuncEntry {
            path: path.to_string(),
            message: None,
            severity: None,
            doc: None,
        }
    }

    #[test]
    fn loads_entries_in_order() {
        let mut exit = entry("std::process::exit");
        exit.severity = Some("warning".to_string());
        exit.doc = Some("docs/exit.md".to_string());

        let set = load(&[exit, entry(".unwrap")]).unwrap();
        let funcs: Vec<_> = set.iter().collect();
        assert_eq!(funcs.len(), 2);
        assert_eq!(funcs[0].severity(), Severity::Warning);
        assert_eq!(funcs[0].doc_ref(), Some("docs/exit.md"));
        assert_eq!(funcs[1].severity(), Severity::Error);
    }

    #[test]
    fn reports_field_context() {
        let err = load(&[entry("ok"), entry("std::")]).unwrap_err();
        assert!(err.to_string().starts_with("bad-funcs[1].path:"), "{err}");
    }

    #[test]
    fn rejects_unknown_severity() {
        let mut e = entry("std::process::exit");
        e.severity = Some("fatal".to_string());
        let err = load(&[e]).unwrap_err();
        assert!(matches!(err, LoadError::UnknownSeverity { .. }));
    }

    #[test]
    fn collects_duplicates() {
        let err = load(&[entry("a"), entry("a"), entry("b"), entry("b")]).unwrap_err();
        match err {
            LoadError::CrossRef(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }
}
