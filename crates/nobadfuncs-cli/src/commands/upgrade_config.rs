//! Upgrade-config command implementation.

use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::asset::UpgradeFn;

/// Upgrades `file` (or stdin when absent or `-`).
///
/// Prints the result, or rewrites `file` when `in_place` is set.
pub fn run(upgrade: UpgradeFn, file: Option<&Path>, in_place: bool) -> Result<()> {
    let file = file.filter(|f| *f != Path::new("-"));

    let input = match file {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read config from stdin")?;
            buf
        }
    };

    let upgraded = upgrade(&input).context("Failed to upgrade config")?;

    match file {
        Some(path) if in_place => {
            if upgraded == input {
                tracing::info!("{} is already up to date", path.display());
                return Ok(());
            }
            std::fs::write(path, &upgraded)
                .with_context(|| format!("Failed to write config: {}", path.display()))?;
            tracing::info!("Upgraded {}", path.display());
        }
        _ => std::io::stdout()
            .write_all(&upgraded)
            .context("Failed to write upgraded config")?,
    }

    Ok(())
}
