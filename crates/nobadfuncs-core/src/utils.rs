//! Utility functions for rule implementations.

pub mod allowance;
pub mod attributes;
pub mod paths;

#[doc(inline)]
pub use allowance::{check_allow_with_reason, AllowCheck};
#[doc(inline)]
pub use attributes::{has_cfg_test, has_test_attr};
#[doc(inline)]
pub use paths::path_matches;
