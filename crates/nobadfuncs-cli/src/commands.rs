//! Sub-command implementations.

pub mod init;
pub mod output;
pub mod run;
pub mod upgrade_config;
