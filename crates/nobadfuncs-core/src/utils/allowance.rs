//! Comment-based allowance directives.
//!
//! Supports directives like:
//! ```text
//! // nobadfuncs: allow(std::process::exit) reason="CLI entry point"
//! ```
//!
//! The directive applies to the line it is written on (as a trailing
//! comment) and to the line directly below it.

use std::collections::HashSet;

/// Keyword that introduces a directive inside a `//` comment.
pub const DIRECTIVE_PREFIX: &str = "nobadfuncs:";

/// Result of checking for an allow directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowCheck {
    /// Not allowed.
    Denied,
    /// Allowed with optional reason.
    Allowed {
        /// The reason provided (if any).
        reason: Option<String>,
    },
}

impl AllowCheck {
    /// Returns true if allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Returns the reason if allowed.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed { reason } => reason.as_deref(),
            Self::Denied => None,
        }
    }
}

/// Parsed allowance directive.
#[derive(Debug, Clone)]
pub struct AllowDirective {
    /// Names (patterns or rule names) that are allowed.
    pub names: HashSet<String>,
    /// Optional reason for the allowance.
    pub reason: Option<String>,
}

/// Checks source code for allowance comments with reason.
///
/// # Arguments
///
/// * `content` - Source code content
/// * `line` - Line number to check (1-indexed)
/// * `names` - Names that the directive may list; `all` always matches
///
/// # Returns
///
/// `AllowCheck::Allowed` with optional reason if a directive covers the line.
#[must_use]
pub fn check_allow_with_reason(content: &str, line: usize, names: &[&str]) -> AllowCheck {
    let lines: Vec<&str> = content.lines().collect();

    for check_line in [line, line.saturating_sub(1)] {
        if check_line == 0 || check_line > lines.len() {
            continue;
        }

        if let Some(directive) = parse_allow_directive(lines[check_line - 1]) {
            if directive.names.contains("all")
                || names.iter().any(|n| directive.names.contains(*n))
            {
                return AllowCheck::Allowed {
                    reason: directive.reason,
                };
            }
        }
    }

    AllowCheck::Denied
}

/// Parses an allowance directive from a source line.
///
/// Every `//` on the line is tried, so `//` inside string literals such as
/// URLs does not hide a trailing directive.
fn parse_allow_directive(line: &str) -> Option<AllowDirective> {
    line.match_indices("//")
        .find_map(|(start, _)| parse_comment(&line[start..]))
}

fn parse_comment(comment: &str) -> Option<AllowDirective> {
    let comment_content = comment.trim_start_matches('/').trim();

    let directive = comment_content.strip_prefix(DIRECTIVE_PREFIX)?.trim();
    let allow_content = directive.strip_prefix("allow(")?.trim();

    let paren_end = allow_content.find(')')?;
    let names: HashSet<String> = allow_content[..paren_end]
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if names.is_empty() {
        return None;
    }

    let rest = allow_content[paren_end + 1..].trim();
    let reason = rest
        .strip_prefix("reason=")
        .map(str::trim)
        .and_then(|r| r.strip_prefix('"'))
        .and_then(|r| r.find('"').map(|end| r[..end].to_string()))
        .filter(|r| !r.trim().is_empty());

    Some(AllowDirective { names, reason })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_allow_directive() {
        let directive = parse_allow_directive("// nobadfuncs: allow(std::process::exit)").unwrap();
        assert!(directive.names.contains("std::process::exit"));
        assert!(directive.reason.is_none());
    }

    #[test]
    fn test_parse_allow_directive_with_reason() {
        let directive =
            parse_allow_directive("// nobadfuncs: allow(.unwrap) reason=\"checked above\"")
                .unwrap();
        assert!(directive.names.contains(".unwrap"));
        assert_eq!(directive.reason, Some("checked above".to_string()));
    }

    #[test]
    fn test_parse_multiple_names() {
        let directive =
            parse_allow_directive("/// nobadfuncs: allow(std::println!, bad-funcs)").unwrap();
        assert!(directive.names.contains("std::println!"));
        assert!(directive.names.contains("bad-funcs"));
    }

    #[test]
    fn test_parse_after_url_literal() {
        let line = r#"let u = "http://x"; f(); // nobadfuncs: allow(all) reason="ok""#;
        let directive = parse_allow_directive(line).unwrap();
        assert!(directive.names.contains("all"));
        assert_eq!(directive.reason.as_deref(), Some("ok"));

        assert!(parse_allow_directive(r#"let u = "http://x"; // plain comment"#).is_none());
    }

    #[test]
    fn test_parse_rejects_other_comments() {
        assert!(parse_allow_directive("// otherlint: allow(x)").is_none());
        assert!(parse_allow_directive("// nobadfuncs: allow()").is_none());
        assert!(parse_allow_directive("let x = 1;").is_none());
    }

    #[test]
    fn test_empty_reason_counts_as_missing() {
        let directive = parse_allow_directive("// nobadfuncs: allow(all) reason=\"  \"").unwrap();
        assert!(directive.reason.is_none());
    }

    #[test]
    fn test_check_allow_on_previous_line() {
        let content = r#"fn foo() {
    // nobadfuncs: allow(std::process::exit) reason="entry point"
    std::process::exit(1);
}"#;

        let result = check_allow_with_reason(content, 3, &["std::process::exit"]);
        assert!(result.is_allowed());
        assert_eq!(result.reason(), Some("entry point"));

        let result = check_allow_with_reason(content, 3, &["std::env::set_var"]);
        assert_eq!(result, AllowCheck::Denied);
    }

    #[test]
    fn test_check_allow_trailing_comment() {
        let content = "fn foo() {\n    x.unwrap(); // nobadfuncs: allow(.unwrap)\n}";
        let result = check_allow_with_reason(content, 2, &[".unwrap"]);
        assert!(result.is_allowed());
        assert_eq!(result.reason(), None);
    }

    #[test]
    fn test_check_allow_all() {
        let content = "// nobadfuncs: allow(all) reason=\"generated\"\nfoo();";
        assert!(check_allow_with_reason(content, 2, &["anything"]).is_allowed());
    }

    #[test]
    fn test_directive_does_not_reach_two_lines_down() {
        let content = "// nobadfuncs: allow(all)\n\nfoo();";
        assert!(!check_allow_with_reason(content, 3, &["foo"]).is_allowed());
    }
}
