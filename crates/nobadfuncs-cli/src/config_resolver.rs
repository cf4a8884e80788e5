//! Configuration file resolution with global fallback.
//!
//! Priority order:
//!
//! 1. `--config` flag (explicit path)
//! 2. `{project}/nobadfuncs.toml`, then `{project}/.nobadfuncs.toml`
//! 3. `$NOBADFUNCS_CONFIG_DIR/config.toml` or `~/.nobadfuncs/config.toml`
//! 4. No config found → defaults (no bad funcs)

use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable overriding the global config directory.
pub const CONFIG_DIR_ENV: &str = "NOBADFUNCS_CONFIG_DIR";

/// Project-level config file names, checked in order.
pub const PROJECT_CONFIG_NAMES: &[&str] = &["nobadfuncs.toml", ".nobadfuncs.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found in the project directory.
    Project(PathBuf),
    /// Found in the global config directory.
    Global(PathBuf),
    /// Nothing found; defaults apply.
    Default,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Returns `true` for the global fallback.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path() {
            Some(p) => write!(f, "{}", p.display()),
            None => write!(f, "defaults"),
        }
    }
}

/// Resolves the configuration file for `project_dir`.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_inner(project_dir, explicit, global_config_dir())
}

/// Takes `global_dir` as a parameter so tests avoid env var races.
fn resolve_inner(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<PathBuf>,
) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(found) = PROJECT_CONFIG_NAMES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|candidate| candidate.is_file())
    {
        tracing::debug!("Found project config: {}", found.display());
        return ConfigSource::Project(found);
    }

    match global_dir.map(|dir| dir.join(GLOBAL_CONFIG_NAME)) {
        Some(candidate) if candidate.is_file() => {
            tracing::debug!("Found global config: {}", candidate.display());
            ConfigSource::Global(candidate)
        }
        _ => ConfigSource::Default,
    }
}

/// Returns the global config directory: `$NOBADFUNCS_CONFIG_DIR` or
/// `~/.nobadfuncs/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".nobadfuncs"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "").unwrap();
        path
    }

    #[test]
    fn explicit_wins_and_is_not_checked() {
        let project = TempDir::new().unwrap();
        touch(project.path(), "nobadfuncs.toml");

        let explicit = Path::new("/nonexistent/custom.toml");
        assert_eq!(
            resolve_inner(project.path(), Some(explicit), None),
            ConfigSource::Explicit(explicit.to_path_buf())
        );
    }

    #[test]
    fn project_names_in_order() {
        let project = TempDir::new().unwrap();
        let hidden = touch(project.path(), ".nobadfuncs.toml");
        assert_eq!(
            resolve_inner(project.path(), None, None),
            ConfigSource::Project(hidden)
        );

        let plain = touch(project.path(), "nobadfuncs.toml");
        assert_eq!(
            resolve_inner(project.path(), None, None),
            ConfigSource::Project(plain)
        );
    }

    #[test]
    fn directories_named_like_configs_are_ignored() {
        let project = TempDir::new().unwrap();
        fs::create_dir(project.path().join("nobadfuncs.toml")).unwrap();
        assert_eq!(
            resolve_inner(project.path(), None, None),
            ConfigSource::Default
        );
    }

    #[test]
    fn global_is_the_last_resort() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        let global_dir = Some(global.path().to_path_buf());

        assert_eq!(
            resolve_inner(project.path(), None, global_dir.clone()),
            ConfigSource::Default
        );

        let global_config = touch(global.path(), "config.toml");
        let source = resolve_inner(project.path(), None, global_dir.clone());
        assert!(source.is_global());
        assert_eq!(source.path(), Some(global_config.as_path()));

        touch(project.path(), "nobadfuncs.toml");
        assert!(matches!(
            resolve_inner(project.path(), None, global_dir),
            ConfigSource::Project(_)
        ));
    }

    #[test]
    fn display_names_the_source() {
        assert_eq!(ConfigSource::Default.to_string(), "defaults");
        assert_eq!(
            ConfigSource::Project(PathBuf::from("/p/nobadfuncs.toml")).to_string(),
            "/p/nobadfuncs.toml"
        );
        assert!(ConfigSource::Default.path().is_none());
        assert!(!ConfigSource::Explicit(PathBuf::new()).is_global());
    }
}
