//! Per-directory version sources
//!
//! [`ConfigSources`] is the seam between the precedence cascade and the
//! filesystem: each method answers "absent" (`Ok(None)`) or the decoded value.
//! Nothing is read until the cascade asks, so a malformed file below the
//! winning source is never touched.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::{env_var, hcl};
use crate::constants::{ENV_VERSION, HCL_FILENAME, RC_FILENAME, VERSION_FILENAME};

/// Readers for the version sources of one working directory.
pub trait ConfigSources {
    /// Trimmed content of `.tgswitchrc`, if the file exists.
    fn rc_version(&self) -> Result<Option<String>>;

    /// Trimmed content of `.terragrunt-version`, if the file exists.
    fn pin_version(&self) -> Result<Option<String>>;

    /// `terragrunt_version_constraint` from `terragrunt.hcl`, if set.
    fn hcl_constraint(&self) -> Result<Option<String>>;

    /// The `TG_VERSION` environment variable, if non-empty.
    fn env_version(&self) -> Option<String>;
}

/// [`ConfigSources`] backed by the files of a working directory.
#[derive(Debug, Clone)]
pub struct WorkingDirSources {
    dir: PathBuf,
    env_version: Option<String>,
}

impl WorkingDirSources {
    /// Sources for `dir`, with `TG_VERSION` read from the process environment.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            env_version: env_var(ENV_VERSION),
        }
    }

    /// Override the environment-provided version.
    #[must_use]
    pub fn with_env_version(mut self, version: Option<String>) -> Self {
        self.env_version = version.filter(|v| !v.is_empty());
        self
    }

    /// The working directory these sources read from.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_version_file(&self, name: &str) -> Result<Option<String>> {
        let path = self.dir.join(name);
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Some(content.trim().to_string()))
    }
}

impl ConfigSources for WorkingDirSources {
    fn rc_version(&self) -> Result<Option<String>> {
        self.read_version_file(RC_FILENAME)
    }

    fn pin_version(&self) -> Result<Option<String>> {
        self.read_version_file(VERSION_FILENAME)
    }

    fn hcl_constraint(&self) -> Result<Option<String>> {
        let path = self.dir.join(HCL_FILENAME);
        if !path.is_file() {
            return Ok(None);
        }

        let constraint = hcl::read_constraint(&path)?;
        Ok(constraint.filter(|c| !c.is_empty()))
    }

    fn env_version(&self) -> Option<String> {
        self.env_version.clone()
    }
}
