//! Path utilities for AST analysis.

/// Checks if a path matches a pattern.
///
/// Supports wildcards:
/// - `*` matches any single segment
/// - `**` matches any number of segments, including none
///
/// # Examples
///
/// ```ignore
/// assert!(path_matches("std::fs::read", "std::fs::*"));
/// assert!(path_matches("std::fs::read", "std::**"));
/// assert!(path_matches("exit", "**::exit"));
/// assert!(!path_matches("std::fs::read", "tokio::*"));
/// ```
#[must_use]
pub fn path_matches(path: &str, pattern: &str) -> bool {
    let path_parts: Vec<&str> = path.split("::").collect();
    let pattern_parts: Vec<&str> = pattern.split("::").collect();

    match_parts(&path_parts, &pattern_parts)
}

fn match_parts(path: &[&str], pattern: &[&str]) -> bool {
    let Some((first_pattern, rest_pattern)) = pattern.split_first() else {
        return path.is_empty();
    };

    match *first_pattern {
        "**" => (0..=path.len()).any(|i| match_parts(&path[i..], rest_pattern)),
        "*" => !path.is_empty() && match_parts(&path[1..], rest_pattern),
        literal => path.first() == Some(&literal) && match_parts(&path[1..], rest_pattern),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_matches_literal() {
        assert!(path_matches("std::fs::read", "std::fs::read"));
        assert!(!path_matches("std::fs::read", "std::fs::write"));
        assert!(!path_matches("std::fs::read", "std::fs"));
    }

    #[test]
    fn test_path_matches_wildcard() {
        assert!(path_matches("std::fs::read", "std::fs::*"));
        assert!(path_matches("std::fs::write", "std::fs::*"));
        assert!(!path_matches("std::io::read", "std::fs::*"));
        assert!(!path_matches("std::fs", "std::fs::*"));
    }

    #[test]
    fn test_path_matches_globstar() {
        assert!(path_matches("std::fs::read", "std::**"));
        assert!(path_matches("std::fs::read", "std::fs::**"));
        assert!(path_matches(
            "std::collections::hash_map::HashMap",
            "std::**"
        ));
        assert!(path_matches("exit", "**::exit"));
        assert!(path_matches("std::process::exit", "**::exit"));
        assert!(!path_matches("std::process::exit_code", "**::exit"));
    }
}
