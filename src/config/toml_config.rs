//! The `.tgswitch.toml` configuration file
//!
//! ```toml
//! bin = "$HOME/bin/terragrunt"
//! version = "0.38.4"
//! ```
//!
//! Both keys are optional. The file is looked up in the working directory
//! first and then in the home directory; the first one found wins and the
//! other is never read.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::TOML_FILENAME;
use crate::core::TgswitchError;
use crate::utils::platform::{paths_equal, resolve_path};

/// Parsed contents of `.tgswitch.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TomlConfig {
    /// Custom bin path; may reference environment variables.
    #[serde(default)]
    pub bin: Option<String>,
    /// Requested Terragrunt version.
    #[serde(default)]
    pub version: Option<String>,
}

impl TomlConfig {
    /// Load and parse a config file.
    ///
    /// # Errors
    ///
    /// [`TgswitchError::ConfigParseError`] if the file cannot be read or is
    /// not valid TOML for this schema.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| TgswitchError::ConfigParseError {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| TgswitchError::ConfigParseError {
            file: path.display().to_string(),
            reason: e.message().to_string(),
        })?;

        debug!("Loaded {} (bin={:?}, version={:?})", path.display(), config.bin, config.version);
        Ok(config)
    }
}

/// Where a discovered TOML file was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TomlLocation {
    /// The working directory (`--chdir` or the process directory).
    CurrentDir,
    /// The user's home directory.
    HomeDir,
}

impl fmt::Display for TomlLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CurrentDir => write!(f, "current directory"),
            Self::HomeDir => write!(f, "home directory"),
        }
    }
}

/// A TOML config together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TomlSource {
    pub config: TomlConfig,
    pub location: TomlLocation,
    pub path: PathBuf,
}

impl TomlSource {
    /// Find and load `.tgswitch.toml`, preferring `working_dir` over `home_dir`.
    ///
    /// Returns `Ok(None)` when neither directory has the file.
    ///
    /// # Errors
    ///
    /// Propagates [`TomlConfig::load_from`] failures for the file found.
    pub fn discover(working_dir: &Path, home_dir: &Path) -> Result<Option<Self>> {
        let candidates =
            [(working_dir, TomlLocation::CurrentDir), (home_dir, TomlLocation::HomeDir)];

        for (dir, location) in candidates {
            let path = dir.join(TOML_FILENAME);
            if path.is_file() {
                let config = TomlConfig::load_from(&path)?;
                return Ok(Some(Self {
                    config,
                    location,
                    path,
                }));
            }
        }

        Ok(None)
    }

    /// The configured version, with surrounding whitespace removed.
    ///
    /// An empty value counts as absent.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.config.version.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    /// Decide the symlink path.
    ///
    /// The configured `bin` is used only when the command-line bin was left at
    /// its default; an explicit `--bin` always wins. The configured value is
    /// expanded for `~` and environment variables.
    ///
    /// # Errors
    ///
    /// Fails when the configured `bin` references an undefined variable.
    pub fn bin_path(&self, cli_bin: &Path, default_bin: &Path) -> Result<PathBuf> {
        match self.config.bin.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
            Some(bin) if paths_equal(cli_bin, default_bin) => resolve_path(bin)
                .with_context(|| format!("Invalid bin path in {}", self.path.display())),
            _ => Ok(cli_bin.to_path_buf()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, content: &str) {
        std::fs::write(dir.join(TOML_FILENAME), content).unwrap();
    }

    #[test]
    fn test_load_full_config() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "bin = \"/opt/bin/terragrunt\"\nversion = \"0.38.4\"\n");

        let config = TomlConfig::load_from(&temp.path().join(TOML_FILENAME)).unwrap();
        assert_eq!(config.bin.as_deref(), Some("/opt/bin/terragrunt"));
        assert_eq!(config.version.as_deref(), Some("0.38.4"));
    }

    #[test]
    fn test_load_empty_config() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "");

        let config = TomlConfig::load_from(&temp.path().join(TOML_FILENAME)).unwrap();
        assert_eq!(config, TomlConfig::default());
    }

    #[test]
    fn test_malformed_config_is_parse_error() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "version = [unterminated");

        let err = TomlConfig::load_from(&temp.path().join(TOML_FILENAME)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TgswitchError>(),
            Some(TgswitchError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn test_discover_prefers_working_dir() {
        let work = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        write(work.path(), "version = \"1.0.0\"");
        write(home.path(), "version = \"2.0.0\"");

        let source = TomlSource::discover(work.path(), home.path()).unwrap().unwrap();
        assert_eq!(source.location, TomlLocation::CurrentDir);
        assert_eq!(source.version(), Some("1.0.0"));
    }

    #[test]
    fn test_discover_falls_back_to_home() {
        let work = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        write(home.path(), "version = \"2.0.0\"");

        let source = TomlSource::discover(work.path(), home.path()).unwrap().unwrap();
        assert_eq!(source.location, TomlLocation::HomeDir);
        assert_eq!(source.location.to_string(), "home directory");
        assert_eq!(source.version(), Some("2.0.0"));
    }

    #[test]
    fn test_discover_nothing() {
        let work = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        assert!(TomlSource::discover(work.path(), home.path()).unwrap().is_none());
    }

    #[test]
    fn test_blank_version_is_absent() {
        let source = TomlSource {
            config: TomlConfig {
                bin: None,
                version: Some("  ".to_string()),
            },
            location: TomlLocation::CurrentDir,
            path: PathBuf::from(TOML_FILENAME),
        };
        assert_eq!(source.version(), None);
    }

    #[test]
    fn test_bin_tie_break() {
        let source = TomlSource {
            config: TomlConfig {
                bin: Some("/custom/terragrunt".to_string()),
                version: None,
            },
            location: TomlLocation::HomeDir,
            path: PathBuf::from(TOML_FILENAME),
        };
        let default_bin = Path::new("/usr/local/bin/terragrunt");

        // CLI left at the default: the TOML bin is used
        assert_eq!(
            source.bin_path(default_bin, default_bin).unwrap(),
            PathBuf::from("/custom/terragrunt")
        );

        // Explicit CLI bin wins
        assert_eq!(
            source.bin_path(Path::new("/explicit/terragrunt"), default_bin).unwrap(),
            PathBuf::from("/explicit/terragrunt")
        );
    }

    #[test]
    fn test_bin_absent_keeps_cli_bin() {
        let source = TomlSource {
            config: TomlConfig::default(),
            location: TomlLocation::HomeDir,
            path: PathBuf::from(TOML_FILENAME),
        };
        let default_bin = Path::new("/usr/local/bin/terragrunt");
        assert_eq!(source.bin_path(default_bin, default_bin).unwrap(), default_bin);
    }
}
