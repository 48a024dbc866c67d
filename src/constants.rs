//! Global constants used throughout the tgswitch codebase.
//!
//! File names, environment variable names and upstream coordinates live here so
//! that the cascade, the installer and the CLI agree on them.

use std::time::Duration;

/// Default location of the `terragrunt` symlink.
pub const DEFAULT_BIN: &str = "/usr/local/bin/terragrunt";

/// Legacy single-line version file (backward compatible).
pub const RC_FILENAME: &str = ".tgswitchrc";

/// Version pin file shared with tgenv-style tooling.
pub const VERSION_FILENAME: &str = ".terragrunt-version";

/// TOML configuration file, looked up in the working directory and then `$HOME`.
pub const TOML_FILENAME: &str = ".tgswitch.toml";

/// Terragrunt infrastructure file that may carry a version constraint.
pub const HCL_FILENAME: &str = "terragrunt.hcl";

/// Attribute in [`HCL_FILENAME`] that holds the version constraint.
pub const HCL_CONSTRAINT_ATTRIBUTE: &str = "terragrunt_version_constraint";

/// Prefix of the downloaded binaries inside the install directory.
pub const VERSION_PREFIX: &str = "terragrunt_";

/// Directory (under `$HOME`) holding downloaded binaries and the recent file.
pub const INSTALL_DIR_NAME: &str = ".terragrunt.versions";

/// File (inside the install directory) listing recently used versions.
pub const RECENT_FILENAME: &str = "RECENT";

/// Maximum number of entries kept in the recent file.
pub const MAX_RECENT_VERSIONS: usize = 3;

/// Suffix appended to recent versions in the interactive menu.
pub const RECENT_MARKER: &str = " *recent";

/// Environment variable holding a requested version.
pub const ENV_VERSION: &str = "TG_VERSION";

/// Environment variable holding a GitHub token for API requests.
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_AUTH_TOKEN";

/// Environment variable enabling the local-preference override.
pub const ENV_PREFER_LOCAL: &str = "TGS_PREFER_LOCAL";

/// Owner of the upstream repository publishing Terragrunt releases.
pub const REPO_OWNER: &str = "gruntwork-io";

/// Name of the upstream repository publishing Terragrunt releases.
pub const REPO_NAME: &str = "terragrunt";

/// Base URL of the GitHub REST API.
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Base URL for release asset downloads.
pub const GITHUB_DOWNLOAD_URL: &str = "https://github.com";

/// Releases requested per catalog page (GitHub maximum).
pub const RELEASES_PER_PAGE: usize = 100;

/// Upper bound on catalog pages followed in one run.
pub const MAX_RELEASE_PAGES: usize = 20;

/// Name of the checksum manifest attached to each release.
pub const CHECKSUMS_FILENAME: &str = "SHA256SUMS";

/// Timeout for a single HTTP request (60 seconds).
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Starting delay for retrying catalog requests (100ms).
pub const STARTING_BACKOFF_DELAY_MS: u64 = 100;

/// Maximum delay between catalog retries (2 seconds).
pub const MAX_BACKOFF_DELAY_MS: u64 = 2_000;

/// Number of retries for a failed catalog page request.
pub const MAX_FETCH_RETRIES: usize = 3;

/// Diagnostic describing the accepted version format.
pub const VERSION_FORMAT_HELP: &str = "Format should be #.#.# or #.#.#-@# where # are numbers and @ are word characters. For example, 0.11.7 and 0.11.9-beta1 are valid versions";

/// Usage hint printed after argument errors.
pub const USAGE_HINT: &str = "Supply the terragrunt version as an argument, or choose from a menu";
