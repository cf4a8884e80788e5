//! Rule that reports references to banned functions.
//!
//! # Detected Patterns
//!
//! Every entry of the configured [`BadFuncSet`]:
//!
//! - `std::process::exit`, `std::env::*`, `**::transmute` (calls and values)
//! - `.unwrap` (method calls, by name)
//! - `std::dbg!` (macro invocations)
//!
//! # Suppression
//!
//! - `// nobadfuncs: allow(std::process::exit) reason="..."` on the same
//!   line or the line above. `bad-funcs` and `all` cover every pattern.
//! - `skip_tests` ignores references inside `#[cfg(test)]` and `#[test]` code.

use std::sync::Arc;

use nobadfuncs_core::references::{self, Reference};
use nobadfuncs_core::utils::check_allow_with_reason;
use nobadfuncs_core::{BadFunc, BadFuncSet, FileContext, Rule, Severity, Suggestion, Violation};

/// Rule code for bad-funcs.
pub const CODE: &str = "NBF001";

/// Rule name for bad-funcs.
pub const NAME: &str = "bad-funcs";

/// Reports references matching a [`BadFuncSet`].
#[derive(Debug, Clone)]
pub struct NoBadFuncs {
    bad_funcs: Arc<BadFuncSet>,
    skip_tests: bool,
}

impl NoBadFuncs {
    /// Creates a new rule for the given set.
    #[must_use]
    pub fn new(bad_funcs: Arc<BadFuncSet>) -> Self {
        Self {
            bad_funcs,
            skip_tests: false,
        }
    }

    /// Ignores references in test code.
    #[must_use]
    pub fn skip_tests(mut self, skip: bool) -> Self {
        self.skip_tests = skip;
        self
    }

    fn check_reference(&self, ctx: &FileContext, reference: &Reference) -> Option<Violation> {
        if self.skip_tests && reference.in_test {
            return None;
        }

        let entry = self.bad_funcs.find(reference)?;
        let names = [entry.pattern().as_str(), reference.path.as_str(), NAME];
        let allow = check_allow_with_reason(ctx.content, reference.location.line, &names);

        if !allow.is_allowed() {
            return Some(report(reference, entry));
        }

        if self.requires_allow_reason(entry.severity()) && allow.reason().is_none() {
            return Some(
                reference
                    .violation(
                        CODE,
                        NAME,
                        Severity::Warning,
                        format!(
                            "Allow directive for `{}` is missing required reason",
                            entry.pattern()
                        ),
                    )
                    .with_suggestion(Suggestion::new(
                        "Add reason=\"...\" to explain why this exception is necessary",
                    )),
            );
        }

        None
    }
}

fn report(reference: &Reference, entry: &BadFunc) -> Violation {
    let violation = reference.violation(CODE, NAME, entry.severity(), entry.message_for(reference));
    match entry.doc_ref() {
        Some(doc) => violation.with_doc_ref(doc),
        None => violation,
    }
}

impl Rule for NoBadFuncs {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids references to configured banned functions"
    }

    fn check(&self, ctx: &FileContext, ast: &syn::File) -> Vec<Violation> {
        if self.bad_funcs.is_empty() {
            return Vec::new();
        }

        references::collect(ctx, ast)
            .iter()
            .filter_map(|r| self.check_reference(ctx, r))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nobadfuncs_core::Config;
    use std::path::Path;

    const CONFIG: &str = r#"
[[bad-funcs]]
path = "std::process::exit"
message = "return an ExitCode from main instead"
doc = "CONTRIBUTING.md#exit-codes"

[[bad-funcs]]
path = ".unwrap"
severity = "warning"

[[bad-funcs]]
path = "**::dbg!"
"#;

    fn rule() -> NoBadFuncs {
        let set = Config::parse(CONFIG).unwrap().bad_func_set().unwrap();
        NoBadFuncs::new(Arc::new(set))
    }

    fn check_with(rule: &NoBadFuncs, file: &str, code: &str) -> Vec<Violation> {
        let ast = syn::parse_file(code).expect("Failed to parse");
        let ctx = FileContext::from_source(Path::new(file), code);
        rule.check(&ctx, &ast)
    }

    fn check_code(code: &str) -> Vec<Violation> {
        check_with(&rule(), "src/lib.rs", code)
    }

    #[test]
    fn test_detects_every_spelling() {
        let violations = check_code(
            r"
use std::process;
use std::process::exit as quit;

fn a() { std::process::exit(1); }
fn b() { process::exit(2); }
fn c() { quit(3); }
fn d() -> Option<fn(i32) -> !> { Some(::std::process::exit) }
",
        );
        let lines: Vec<usize> = violations.iter().map(|v| v.location.line).collect();
        assert_eq!(lines, vec![5, 6, 7, 8]);
        assert!(violations.iter().all(|v| v.code == CODE && v.rule == NAME));
        assert_eq!(violations[0].message, "return an ExitCode from main instead");
        assert_eq!(
            violations[0].doc_ref.as_deref(),
            Some("CONTRIBUTING.md#exit-codes")
        );
    }

    #[test]
    fn test_detects_crate_relative_paths() {
        let set = Config::parse("[[bad-funcs]]\npath = \"crate::legacy::connect\"\n")
            .unwrap()
            .bad_func_set()
            .unwrap();
        let rule = NoBadFuncs::new(Arc::new(set));
        let violations = check_with(
            &rule,
            "src/net/client.rs",
            "fn f() { super::super::legacy::connect(); crate::legacy::connect(); }",
        );
        assert_eq!(violations.len(), 2);
        assert_eq!(
            violations[0].message,
            "`crate::legacy::connect` is a banned function"
        );
    }

    #[test]
    fn test_methods_and_macros() {
        let violations = check_code("fn f(x: Option<u8>) { dbg!(x.unwrap()); }");
        let found: Vec<(Severity, &str)> = violations
            .iter()
            .map(|v| (v.severity, v.message.as_str()))
            .collect();
        assert_eq!(
            found,
            vec![
                (Severity::Error, "`std::dbg!` is a banned function"),
                (Severity::Warning, "`.unwrap` is a banned function"),
            ]
        );
    }

    #[test]
    fn test_allow_with_reason() {
        let violations = check_code(
            r#"
fn main() {
    // nobadfuncs: allow(std::process::exit) reason="CLI entry point"
    std::process::exit(1);
    std::process::exit(2); // nobadfuncs: allow(bad-funcs) reason="same"
}
"#,
        );
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn test_allow_without_reason_warns_for_errors() {
        let violations = check_code(
            r"
fn main(x: Option<u8>) {
    // nobadfuncs: allow(all)
    std::process::exit(1);
    // nobadfuncs: allow(.unwrap)
    x.unwrap();
}
",
        );
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].severity, Severity::Warning);
        assert_eq!(violations[0].location.line, 4);
        assert!(violations[0].message.contains("missing required reason"));
        assert!(violations[0].suggestion.is_some());
    }

    #[test]
    fn test_skip_tests() {
        let code = r"
fn a() { std::process::exit(1); }

#[cfg(test)]
mod tests {
    #[test]
    fn t() { std::process::exit(2); }
}
";
        assert_eq!(check_code(code).len(), 2);

        let skipping = rule().skip_tests(true);
        let violations = check_with(&skipping, "src/lib.rs", code);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].location.line, 2);
    }

    #[test]
    fn test_skip_tests_keeps_non_test_cfg() {
        let code = r"
#[cfg(not(test))]
fn prod() { std::process::exit(1); }

#[cfg(any(test, unix))]
fn shared() { std::process::exit(2); }
";
        let skipping = rule().skip_tests(true);
        let lines: Vec<usize> = check_with(&skipping, "src/lib.rs", code)
            .iter()
            .map(|v| v.location.line)
            .collect();
        assert_eq!(lines, vec![3, 6]);
    }

    #[test]
    fn test_trailing_allow_after_url_literal() {
        let violations = check_code(
            r#"
fn main() {
    let _u = "http://x"; std::process::exit(1); // nobadfuncs: allow(all) reason="ok"
}
"#,
        );
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn test_empty_set_reports_nothing() {
        let rule = NoBadFuncs::new(Arc::new(BadFuncSet::default()));
        assert!(check_with(&rule, "src/lib.rs", "fn f() { std::process::exit(1); }").is_empty());
    }

    #[test]
    fn test_display() {
        let violations = check_code("fn f() { std::process::exit(1); }");
        insta::assert_snapshot!(
            violations[0].to_string(),
            @"src/lib.rs:1:24: error [NBF001] return an ExitCode from main instead (see: CONTRIBUTING.md#exit-codes)"
        );
    }
}
