//! File system helpers
//!
//! Writes go through a temporary file and a rename so a reader never sees a
//! partially written file, and the bin symlink is swapped the same way so
//! `terragrunt` on `PATH` always points at a complete binary.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::TgswitchError;

/// Create `path` and its parents if needed.
///
/// # Errors
///
/// Fails if the directory cannot be created or `path` exists as a file.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    } else if !path.is_dir() {
        return Err(anyhow::anyhow!("Path exists but is not a directory: {}", path.display()));
    }
    Ok(())
}

/// Sibling path used while a file is being replaced.
fn temp_sibling(path: &Path, tag: &str) -> PathBuf {
    let name = path.file_name().map_or_else(|| "tgswitch".into(), |n| n.to_string_lossy().into_owned());
    path.with_file_name(format!(".{name}.{tag}.{}", std::process::id()))
}

/// Atomically writes bytes to a file using a write-then-rename strategy.
///
/// Parent directories are created as needed. The content is synced to disk
/// before the rename.
///
/// # Errors
///
/// Fails if any step of the write, sync or rename fails.
///
/// # Examples
///
/// ```rust,no_run
/// use tgswitch::utils::fs::atomic_write;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// atomic_write(Path::new("/tmp/RECENT"), b"0.38.4\n")?;
/// # Ok(())
/// # }
/// ```
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    let temp_path = temp_sibling(path, "tmp");
    {
        let mut file = fs::File::create(&temp_path)
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;
        file.write_all(content)
            .with_context(|| format!("Failed to write to temp file: {}", temp_path.display()))?;
        file.sync_all().with_context(|| "Failed to sync file to disk")?;
    }

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;
    Ok(())
}

/// Mark `path` executable (`0755`). A no-op on Windows.
///
/// # Errors
///
/// Fails if the permissions cannot be changed.
pub fn set_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))
            .with_context(|| format!("Failed to make {} executable", path.display()))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

/// Point `link` at `target`, replacing whatever `link` was before.
///
/// On Unix a new symlink is created under a temporary name next to `link`
/// and renamed over it, so `link` is never missing. On Windows the old entry
/// is removed first and a file symlink created.
///
/// # Errors
///
/// [`TgswitchError::SymlinkFailed`] when the link cannot be created, which
/// usually means the bin directory is not writable.
pub fn replace_symlink(target: &Path, link: &Path) -> Result<()> {
    let failed = || TgswitchError::SymlinkFailed {
        link: link.display().to_string(),
        target: target.display().to_string(),
    };

    if let Some(parent) = link.parent()
        && !parent.as_os_str().is_empty()
    {
        ensure_dir(parent).with_context(failed)?;
    }

    debug!("Linking {} -> {}", link.display(), target.display());

    #[cfg(unix)]
    {
        let temp_link = temp_sibling(link, "link");
        let _ = fs::remove_file(&temp_link);
        std::os::unix::fs::symlink(target, &temp_link).with_context(failed)?;
        if let Err(e) = fs::rename(&temp_link, link) {
            let _ = fs::remove_file(&temp_link);
            return Err(anyhow::Error::new(e).context(failed()));
        }
    }

    #[cfg(windows)]
    {
        if fs::symlink_metadata(link).is_ok() {
            fs::remove_file(link).with_context(failed)?;
        }
        std::os::windows::fs::symlink_file(target, link).with_context(failed)?;
    }

    Ok(())
}
