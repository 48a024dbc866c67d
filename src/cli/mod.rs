//! Command-line interface for tgswitch.
//!
//! tgswitch has a single command: resolve the Terragrunt version this
//! directory asks for, install it if needed and point the `terragrunt`
//! symlink at it.
//!
//! # Usage
//!
//! ```bash
//! # Switch to an explicit version
//! tgswitch 0.38.4
//!
//! # Read the version from .tgswitchrc, .terragrunt-version, terragrunt.hcl,
//! # TG_VERSION or .tgswitch.toml (in that order), or ask
//! tgswitch
//!
//! # Use another directory and symlink location
//! tgswitch -c ./live/prod -b ~/bin/terragrunt
//! ```
//!
//! # Global Options
//!
//! - `--verbose` - Enable debug logging
//! - `--quiet` / `-q` - Suppress progress lines and the download bar
//!
//! # Module Structure
//!
//! - [`prompt`] - the interactive version menu
//! - [`switcher`] - resolves a cascade selection, installs and switches

pub mod prompt;
pub mod switcher;

pub use prompt::{InquirePicker, VersionPicker};
pub use switcher::Switcher;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

use crate::cascade::{self, ResolutionRequest};
use crate::catalog::GithubReleases;
use crate::config::{Settings, TomlSource, WorkingDirSources, default_bin};
use crate::installer::BinaryInstaller;

/// Runtime options derived from the global flags.
///
/// Kept apart from [`Cli`] so `main` can set up logging before anything
/// else runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Default log filter when `RUST_LOG` is not set.
    pub log_level: String,

    /// Whether progress lines and the download bar are hidden.
    pub quiet: bool,
}

/// Switch between Terragrunt versions.
#[derive(Parser, Debug)]
#[command(
    name = "tgswitch",
    about = "Switch between Terragrunt versions",
    long_about = "tgswitch installs the requested Terragrunt version into ~/.terragrunt.versions \
                  and points the terragrunt binary at it. Without a version argument the version \
                  is read from .tgswitchrc, .terragrunt-version, terragrunt.hcl, TG_VERSION or \
                  .tgswitch.toml; if none is set, a menu is shown.",
    disable_version_flag = true
)]
pub struct Cli {
    /// Terragrunt version to switch to, e.g. 0.38.4.
    version: Option<String>,

    /// Location of the terragrunt symlink.
    #[arg(short, long, value_name = "PATH", default_value_os_t = default_bin())]
    bin: PathBuf,

    /// Directory to read version files from.
    #[arg(short = 'c', long, value_name = "DIR")]
    chdir: Option<PathBuf>,

    /// Print the tgswitch version and exit.
    #[arg(short = 'v', long = "version")]
    show_version: bool,

    /// Enable debug logging.
    #[arg(long, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress progress output.
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Translate the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        CliConfig {
            log_level: if self.verbose { "debug" } else { "warn" }.to_string(),
            quiet: self.quiet,
        }
    }

    /// Run tgswitch.
    ///
    /// # Errors
    ///
    /// Any configuration, resolution, catalog, prompt or install failure;
    /// `main` turns these into an error report and exit code 1.
    pub async fn execute(self) -> Result<()> {
        if self.show_version {
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }

        let settings = Settings::from_env()?;
        self.execute_with_settings(&settings).await
    }

    /// Run tgswitch with explicit settings.
    ///
    /// # Errors
    ///
    /// See [`Cli::execute`].
    pub async fn execute_with_settings(self, settings: &Settings) -> Result<()> {
        let config = self.build_config();
        let working_dir = self.working_dir()?;

        let toml = TomlSource::discover(&working_dir, &settings.home_dir)?;
        if let Some(toml) = &toml
            && !config.quiet
        {
            println!("Reading configuration from {}", toml.location.to_string().cyan());
        }

        let request = ResolutionRequest {
            version_arg: self.version,
            cli_bin: self.bin,
            default_bin: settings.default_bin.clone(),
            toml,
        };
        let selection = cascade::select(&request, &WorkingDirSources::new(&working_dir))?;

        let catalog = GithubReleases::new(settings)?;
        let installer = BinaryInstaller::new(settings)?.quiet(config.quiet);
        Switcher::new(settings, catalog, installer, InquirePicker::default())
            .quiet(config.quiet)
            .run(&selection)
            .await?;
        Ok(())
    }

    fn working_dir(&self) -> Result<PathBuf> {
        match &self.chdir {
            Some(dir) => {
                if !dir.is_dir() {
                    anyhow::bail!("Directory does not exist: {}", dir.display());
                }
                Ok(dir.clone())
            }
            None => std::env::current_dir().context("Failed to determine current directory"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["tgswitch"]).unwrap();
        assert_eq!(cli.version, None);
        assert_eq!(cli.bin, default_bin());
        assert_eq!(cli.chdir, None);
        assert!(!cli.show_version);
        assert_eq!(
            cli.build_config(),
            CliConfig {
                log_level: "warn".to_string(),
                quiet: false,
            }
        );
    }

    #[test]
    fn test_parse_version_and_overrides() {
        let cli = Cli::try_parse_from(["tgswitch", "0.38.4", "-b", "/tmp/terragrunt", "-c", "/srv/live"])
            .unwrap();
        assert_eq!(cli.version.as_deref(), Some("0.38.4"));
        assert_eq!(cli.bin, PathBuf::from("/tmp/terragrunt"));
        assert_eq!(cli.chdir, Some(PathBuf::from("/srv/live")));

        let cli = Cli::try_parse_from(["tgswitch", "--bin", "/tmp/tg", "--chdir", "."]).unwrap();
        assert_eq!(cli.bin, PathBuf::from("/tmp/tg"));
        assert_eq!(cli.chdir, Some(PathBuf::from(".")));
    }

    #[test]
    fn test_short_v_is_version_not_verbose() {
        let cli = Cli::try_parse_from(["tgswitch", "-v"]).unwrap();
        assert!(cli.show_version);
        assert!(!cli.verbose);

        let cli = Cli::try_parse_from(["tgswitch", "--version"]).unwrap();
        assert!(cli.show_version);
    }

    #[test]
    fn test_verbosity_flags() {
        let cli = Cli::try_parse_from(["tgswitch", "--verbose"]).unwrap();
        assert_eq!(cli.build_config().log_level, "debug");

        let cli = Cli::try_parse_from(["tgswitch", "-q"]).unwrap();
        assert!(cli.build_config().quiet);

        assert!(Cli::try_parse_from(["tgswitch", "--verbose", "--quiet"]).is_err());
    }

    #[test]
    fn test_rejects_extra_positionals() {
        assert!(Cli::try_parse_from(["tgswitch", "0.38.4", "0.38.3"]).is_err());
    }

    #[tokio::test]
    async fn test_missing_chdir_is_an_error() {
        let home = tempfile::TempDir::new().unwrap();
        let missing = home.path().join("missing");
        let cli = Cli::try_parse_from([OsString::from("tgswitch"), "-c".into(), missing.into_os_string()])
            .unwrap();

        let err = cli
            .execute_with_settings(&Settings::with_home(home.path().to_path_buf()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Directory does not exist"));
    }

    #[tokio::test]
    async fn test_invalid_argument_fails_before_network() {
        let home = tempfile::TempDir::new().unwrap();
        let cli = Cli::try_parse_from([
            OsString::from("tgswitch"),
            "abc".into(),
            "-c".into(),
            home.path().as_os_str().to_owned(),
        ])
        .unwrap();

        let err = cli
            .execute_with_settings(&Settings::with_home(home.path().to_path_buf()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid terragrunt version 'abc'"));
    }
}
