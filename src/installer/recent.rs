//! The recently used versions file.
//!
//! `<install_dir>/RECENT` holds up to [`MAX_RECENT_VERSIONS`] versions, newest
//! first, one per line. Lines that are not valid versions are dropped on read
//! so a hand-edited file cannot poison the interactive menu.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::{MAX_RECENT_VERSIONS, RECENT_FILENAME};
use crate::utils::fs::atomic_write;
use crate::version::is_valid_version;

/// Handle on the recent-versions file of an install directory.
#[derive(Debug, Clone)]
pub struct RecentVersions {
    path: PathBuf,
}

impl RecentVersions {
    /// The recent file inside `install_dir`.
    #[must_use]
    pub fn new(install_dir: &Path) -> Self {
        Self {
            path: install_dir.join(RECENT_FILENAME),
        }
    }

    /// Path of the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Recent versions, newest first. A missing file is an empty list.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read.
    pub fn load(&self) -> Result<Vec<String>> {
        if !self.path.is_file() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

        let mut versions: Vec<String> = Vec::new();
        for line in content.lines().map(str::trim).filter(|line| !line.is_empty()) {
            if !is_valid_version(line) {
                debug!("Ignoring invalid entry '{line}' in {}", self.path.display());
                continue;
            }
            if !versions.iter().any(|v| v == line) {
                versions.push(line.to_string());
            }
        }
        versions.truncate(MAX_RECENT_VERSIONS);
        Ok(versions)
    }

    /// Move `version` to the front of the list, trimming it to the maximum size.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or written.
    pub fn add(&self, version: &str) -> Result<()> {
        let mut versions = self.load()?;
        versions.retain(|v| v != version);
        versions.insert(0, version.to_string());
        versions.truncate(MAX_RECENT_VERSIONS);

        let mut content = versions.join("\n");
        content.push('\n');
        atomic_write(&self.path, content.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        assert!(RecentVersions::new(temp.path()).load().unwrap().is_empty());
    }

    #[test]
    fn test_add_keeps_newest_first_and_caps() {
        let temp = TempDir::new().unwrap();
        let recent = RecentVersions::new(temp.path());

        for version in ["0.1.0", "0.2.0", "0.3.0", "0.4.0"] {
            recent.add(version).unwrap();
        }
        assert_eq!(recent.load().unwrap(), ["0.4.0", "0.3.0", "0.2.0"]);

        recent.add("0.2.0").unwrap();
        assert_eq!(recent.load().unwrap(), ["0.2.0", "0.4.0", "0.3.0"]);
    }

    #[test]
    fn test_invalid_lines_are_dropped() {
        let temp = TempDir::new().unwrap();
        let recent = RecentVersions::new(temp.path());
        std::fs::write(recent.path(), "0.38.4\ngarbage\n\n0.38.4\n0.37.0\n").unwrap();
        assert_eq!(recent.load().unwrap(), ["0.38.4", "0.37.0"]);
    }
}
