//! Upgrading configuration from older schema versions.
//!
//! ```text
//! version 0 (unversioned)          version 1
//! exclude = [...]            →     version = 1
//! [bad-funcs]                      [analyzer] exclude = [...]
//! "path" = "message"               [[bad-funcs]] path / message
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::config::{
    is_legacy_layout, AnalyzerConfig, BadFuncEntry, Config, ConfigError, CURRENT_VERSION,
};

/// Errors from [`upgrade_config`].
#[derive(Debug, thiserror::Error)]
pub enum UpgradeError {
    /// The input is not UTF-8.
    #[error("config is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// The input is not valid TOML, or not a valid version 0 config.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The input declares a version this release does not know.
    #[error("unsupported config version {0}")]
    UnsupportedVersion(toml::Value),

    /// The input or the upgraded output fails validation.
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// Version 0 layout: a flat pattern → message table.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LegacyConfig {
    #[serde(default)]
    exclude: Vec<String>,
    #[serde(rename = "bad-funcs", default)]
    bad_funcs: BTreeMap<String, String>,
}

impl LegacyConfig {
    fn into_current(self) -> Config {
        let mut analyzer = AnalyzerConfig::default();
        if !self.exclude.is_empty() {
            analyzer.exclude = self.exclude;
        }

        let bad_funcs = self
            .bad_funcs
            .into_iter()
            .map(|(path, message)| BadFuncEntry {
                path,
                message: Some(message).filter(|m| !m.is_empty()),
                severity: None,
                doc: None,
            })
            .collect();

        Config {
            analyzer,
            bad_funcs,
            ..Config::default()
        }
    }
}

/// Upgrades a serialized configuration to the current schema.
///
/// Empty input stays empty and current configs are returned unchanged, so
/// upgrading is idempotent. The output always parses with [`Config::parse`].
///
/// # Errors
///
/// Returns an error for non-UTF-8 input, invalid TOML, an unknown version,
/// or a config that does not validate.
pub fn upgrade_config(old: &[u8]) -> Result<Vec<u8>, UpgradeError> {
    let text = std::str::from_utf8(old)?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let table: toml::Table = toml::from_str(text)?;
    let is_current = match table.get("version") {
        Some(toml::Value::Integer(v)) if *v == i64::from(CURRENT_VERSION) => true,
        Some(other) => return Err(UpgradeError::UnsupportedVersion(other.clone())),
        None => !is_legacy_layout(&table),
    };

    if is_current {
        Config::parse(text)?;
        tracing::debug!("config is already at version {CURRENT_VERSION}");
        return Ok(old.to_vec());
    }

    let legacy: LegacyConfig = toml::Value::Table(table).try_into()?;
    tracing::info!(
        entries = legacy.bad_funcs.len(),
        "upgrading config from version 0 to {CURRENT_VERSION}"
    );
    let rendered = legacy.into_current().to_toml()?;
    Config::parse(&rendered)?;
    Ok(rendered.into_bytes())
}
