//! Configuration for a tgswitch run
//!
//! Everything the switcher needs to know about its environment is gathered
//! once at startup into [`Settings`] and passed down by reference; no other
//! module reads process-wide state on its own.
//!
//! The per-directory configuration sources are read through
//! [`ConfigSources`], whose filesystem implementation is
//! [`WorkingDirSources`]:
//!
//! | File | Location | Reader |
//! |------|----------|--------|
//! | `.tgswitch.toml` | working directory, then `$HOME` | [`toml_config`] |
//! | `.tgswitchrc` | working directory | [`sources`] |
//! | `.terragrunt-version` | working directory | [`sources`] |
//! | `terragrunt.hcl` | working directory | [`hcl`] |
//!
//! # Environment Variables
//!
//! - `GITHUB_AUTH_TOKEN` - token sent to the GitHub API
//! - `TGS_PREFER_LOCAL` - enable the local-preference override
//! - `TG_VERSION` - requested version (read through [`ConfigSources`])

pub mod hcl;
pub mod sources;
pub mod toml_config;

pub use sources::{ConfigSources, WorkingDirSources};
pub use toml_config::{TomlConfig, TomlLocation, TomlSource};

use anyhow::Result;
use std::path::PathBuf;

use crate::constants::{DEFAULT_BIN, ENV_GITHUB_TOKEN, ENV_PREFER_LOCAL, INSTALL_DIR_NAME};
use crate::utils::platform::{get_home_dir, with_exe_suffix};

/// Startup configuration, constructed once and passed by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Token for authenticated GitHub API requests.
    pub github_token: Option<String>,
    /// Whether a constraint should first be resolved against installed binaries.
    pub prefer_local: bool,
    /// The user's home directory.
    pub home_dir: PathBuf,
    /// Where versioned binaries and the recent file are kept.
    pub install_dir: PathBuf,
    /// The default symlink location (with `.exe` on Windows).
    pub default_bin: PathBuf,
}

impl Settings {
    /// Build settings from the process environment.
    ///
    /// # Errors
    ///
    /// Fails with [`TgswitchError::HomeDirNotFound`] if the home directory
    /// cannot be determined.
    pub fn from_env() -> Result<Self> {
        let home_dir = get_home_dir()?;

        let mut settings = Self::with_home(home_dir);
        settings.github_token = env_var(ENV_GITHUB_TOKEN);
        settings.prefer_local = env_var(ENV_PREFER_LOCAL).as_deref().and_then(parse_bool).unwrap_or(false);
        Ok(settings)
    }

    /// Settings rooted at `home_dir` with every switch off.
    #[must_use]
    pub fn with_home(home_dir: PathBuf) -> Self {
        Self {
            github_token: None,
            prefer_local: false,
            install_dir: home_dir.join(INSTALL_DIR_NAME),
            home_dir,
            default_bin: default_bin(),
        }
    }
}

/// The platform default bin path.
#[must_use]
pub fn default_bin() -> PathBuf {
    PathBuf::from(with_exe_suffix(DEFAULT_BIN))
}

/// Read an environment variable; unset and empty are both `None`.
#[must_use]
pub fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Parse a boolean flag value.
///
/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`; anything else
/// is `None`.
#[must_use]
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_parse_bool() {
        for value in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(parse_bool(value), Some(true), "{value}");
        }
        for value in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse_bool(value), Some(false), "{value}");
        }
        for value in ["", "yes", "tRuE", "2", " true"] {
            assert_eq!(parse_bool(value), None, "{value:?}");
        }
    }

    #[test]
    fn test_with_home_layout() {
        let settings = Settings::with_home(PathBuf::from("/home/user"));
        assert_eq!(settings.install_dir, PathBuf::from("/home/user/.terragrunt.versions"));
        assert_eq!(settings.default_bin, default_bin());
        assert!(!settings.prefer_local);
        assert!(settings.github_token.is_none());
    }

    #[test]
    #[serial]
    fn test_from_env_reads_switches() {
        // SAFETY: serialized with other environment-mutating tests
        unsafe {
            std::env::set_var(ENV_PREFER_LOCAL, "true");
            std::env::set_var(ENV_GITHUB_TOKEN, "secret");
        }
        let settings = Settings::from_env().unwrap();
        assert!(settings.prefer_local);
        assert_eq!(settings.github_token.as_deref(), Some("secret"));

        unsafe {
            std::env::set_var(ENV_PREFER_LOCAL, "maybe");
            std::env::set_var(ENV_GITHUB_TOKEN, "");
        }
        let settings = Settings::from_env().unwrap();
        assert!(!settings.prefer_local);
        assert!(settings.github_token.is_none());

        unsafe {
            std::env::remove_var(ENV_PREFER_LOCAL);
            std::env::remove_var(ENV_GITHUB_TOKEN);
        }
    }
}
