//! Attribute parsing utilities for rule implementations.

use syn::punctuated::Punctuated;
use syn::{Attribute, Meta, Token};

/// Checks if attributes contain a test attribute (`#[test]`, `#[tokio::test]`, ...).
#[must_use]
pub fn has_test_attr(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| {
        attr.path()
            .segments
            .last()
            .is_some_and(|seg| seg.ident == "test")
    })
}

/// Checks if attributes contain a `#[cfg(...)]` that only holds under `test`.
///
/// Matches `#[cfg(test)]` as well as combinations such as
/// `#[cfg(all(test, feature = "x"))]`. `#[cfg(not(test))]`,
/// `#[cfg(any(test, unix))]` and string values like
/// `#[cfg(feature = "test")]` do not count.
#[must_use]
pub fn has_cfg_test(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| {
        if !attr.path().is_ident("cfg") {
            return false;
        }
        match &attr.meta {
            Meta::List(list) => list
                .parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)
                .is_ok_and(|preds| preds.iter().any(|p| implies_test(p, true))),
            _ => false,
        }
    })
}

/// Whether `pred` evaluating to `holds` forces `test` to be set.
fn implies_test(pred: &Meta, holds: bool) -> bool {
    match pred {
        Meta::Path(path) => holds && path.is_ident("test"),
        Meta::NameValue(_) => false,
        Meta::List(list) => {
            let Ok(args) = list.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)
            else {
                return false;
            };
            // `all` holding and `any` failing pin every argument.
            let pins_all = if list.path.is_ident("all") {
                holds
            } else if list.path.is_ident("any") {
                !holds
            } else if list.path.is_ident("not") {
                return args.len() == 1 && args.iter().all(|a| implies_test(a, !holds));
            } else {
                return false;
            };
            if pins_all {
                args.iter().any(|a| implies_test(a, holds))
            } else {
                !args.is_empty() && args.iter().all(|a| implies_test(a, holds))
            }
        }
    }
}
