//! tgswitch - switch between Terragrunt versions
//!
//! tgswitch decides which Terragrunt version a directory needs, installs that
//! release binary into `~/.terragrunt.versions` and points the `terragrunt`
//! symlink at it.
//!
//! # Architecture Overview
//!
//! A run flows through four stages:
//!
//! 1. [`config`] gathers [`Settings`](config::Settings) from the environment
//!    and discovers `.tgswitch.toml`
//! 2. [`cascade`] walks the source precedence ladder and produces a
//!    [`Selection`](cascade::Selection)
//! 3. [`cli::switcher`] resolves the selection against the [`catalog`], using
//!    the [`version`] resolver for constraints or the interactive menu
//! 4. [`installer`] downloads the binary if needed and swaps the symlink
//!
//! # Version Sources
//!
//! | Priority | Source |
//! |----------|--------|
//! | 1 | positional argument |
//! | 2 | `.tgswitchrc` |
//! | 3 | `.terragrunt-version` |
//! | 4 | `terragrunt_version_constraint` in `terragrunt.hcl` |
//! | 5 | `TG_VERSION` |
//! | 6 | `version` in `.tgswitch.toml` |
//! | 7 | interactive menu |
//!
//! # Core Modules
//!
//! - [`cascade`] - source precedence ladder
//! - [`catalog`] - published versions from GitHub Releases
//! - [`cli`] - command-line parsing and the switch workflow
//! - [`config`] - settings and configuration file readers
//! - [`core`] - error types and user-facing error reports
//! - [`installer`] - downloads, checksums, symlinks and the recent list
//! - [`utils`] - platform names, filesystem helpers and progress bars
//! - [`version`] - version validation, constraints and resolution

pub mod cascade;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod installer;
pub mod utils;
pub mod version;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
