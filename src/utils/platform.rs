//! Platform-specific helpers
//!
//! Release assets are published per operating system and architecture, and
//! Windows binaries carry an `.exe` suffix. Everything that depends on the
//! compilation target is collected here so the installer and the config layer
//! stay platform-neutral.
//!
//! # Asset Naming
//!
//! | Target | Asset |
//! |--------|-------|
//! | Linux x86_64 | `terragrunt_linux_amd64` |
//! | macOS aarch64 | `terragrunt_darwin_arm64` |
//! | Windows x86_64 | `terragrunt_windows_amd64.exe` |

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::core::TgswitchError;

/// Checks if the current platform is Windows.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// The executable suffix of the current platform (`.exe` or empty).
#[must_use]
pub const fn exe_suffix() -> &'static str {
    if is_windows() {
        ".exe"
    } else {
        ""
    }
}

/// Append the platform executable suffix to `name`.
///
/// # Examples
///
/// ```rust
/// use tgswitch::utils::platform::with_exe_suffix;
///
/// let bin = with_exe_suffix("/usr/local/bin/terragrunt");
/// if cfg!(windows) {
///     assert_eq!(bin, "/usr/local/bin/terragrunt.exe");
/// } else {
///     assert_eq!(bin, "/usr/local/bin/terragrunt");
/// }
/// ```
#[must_use]
pub fn with_exe_suffix(name: &str) -> String {
    format!("{name}{}", exe_suffix())
}

/// Operating system name as used in release asset names.
#[must_use]
pub fn os_name() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    }
}

/// Architecture name as used in release asset names.
///
/// Rust's target names are mapped onto the Go-style names the release
/// pipeline publishes (`x86_64` is `amd64`, `aarch64` is `arm64`).
#[must_use]
pub fn arch_name() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "386",
        other => other,
    }
}

/// Gets the home directory path for the current user.
///
/// # Errors
///
/// [`TgswitchError::HomeDirNotFound`] when neither `HOME` nor the platform
/// equivalent is available.
pub fn get_home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| TgswitchError::HomeDirNotFound.into())
}

/// Expand `~` and environment variables in a user-supplied path.
///
/// # Errors
///
/// Fails when the path references an undefined environment variable.
///
/// # Examples
///
/// ```rust,no_run
/// use tgswitch::utils::platform::resolve_path;
///
/// # fn example() -> anyhow::Result<()> {
/// let bin = resolve_path("$HOME/bin/terragrunt")?;
/// println!("{}", bin.display());
/// # Ok(())
/// # }
/// ```
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path).with_context(|| {
        format!(
            "Failed to expand environment variables in path: {path}\n\n\
            Check that every referenced variable is defined (use $VAR or ${{VAR}})"
        )
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}

/// Compare two paths, ignoring case on Windows.
#[must_use]
pub fn paths_equal(path1: &Path, path2: &Path) -> bool {
    if is_windows() {
        path1.to_string_lossy().to_lowercase() == path2.to_string_lossy().to_lowercase()
    } else {
        path1 == path2
    }
}
