//! Rule trait for defining per-file checks.

use crate::context::FileContext;
use crate::types::{Severity, Violation};

/// A per-file rule based on `syn` AST analysis.
///
/// Implement this trait to create rules that analyze individual source files.
/// Rules receive the parsed AST and typically walk it with
/// [`crate::references::collect`] or a `syn::visit::Visit` implementation.
///
/// # Example
///
/// ```ignore
/// use nobadfuncs_core::{FileContext, Rule, Violation};
///
/// pub struct NoTransmute;
///
/// impl Rule for NoTransmute {
///     fn name(&self) -> &'static str { "no-transmute" }
///     fn code(&self) -> &'static str { "NBF100" }
///
///     fn check(&self, ctx: &FileContext, ast: &syn::File) -> Vec<Violation> {
///         nobadfuncs_core::references::collect(ctx, ast)
///             .into_iter()
///             .filter(|r| r.path == "std::mem::transmute")
///             .map(|r| r.violation(self.code(), self.name(), self.default_severity(), "no transmute"))
///             .collect()
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "bad-funcs").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "NBF001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Whether allowing a finding of `severity` requires a reason.
    ///
    /// By default, only `Severity::Error` findings require a reason.
    fn requires_allow_reason(&self, severity: Severity) -> bool {
        severity == Severity::Error
    }

    /// Checks a single file and returns any violations found.
    fn check(&self, ctx: &FileContext, ast: &syn::File) -> Vec<Violation>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Location;
    use std::path::Path;

    struct TestRule;

    impl Rule for TestRule {
        fn name(&self) -> &'static str {
            "test-rule"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }

        fn check(&self, ctx: &FileContext, _ast: &syn::File) -> Vec<Violation> {
            vec![Violation::new(
                self.code(),
                self.name(),
                self.default_severity(),
                Location::new(ctx.relative_path.clone(), 1, 1),
                "Test violation",
            )]
        }
    }

    #[test]
    fn test_rule_defaults() {
        let rule = TestRule;
        assert_eq!(rule.description(), "");
        assert_eq!(rule.default_severity(), Severity::Error);
        assert!(rule.requires_allow_reason(Severity::Error));
        assert!(!rule.requires_allow_reason(Severity::Warning));
    }

    #[test]
    fn test_rule_check_uses_relative_path() {
        let ctx = FileContext::from_source(Path::new("src/lib.rs"), "");
        let ast = syn::parse_file("").unwrap();
        let violations = TestRule.check(&ctx, &ast);
        assert_eq!(violations[0].location.file, Path::new("src/lib.rs"));
    }
}
