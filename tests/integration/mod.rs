//! Integration test suite for tgswitch
//!
//! End-to-end tests that run the `tgswitch` binary against scratch home and
//! working directories. None of them touch the network: every scenario either
//! fails before the catalog is needed or switches to a version that is
//! already installed.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli**: flags, help and version output
//! - **sources**: version source precedence and malformed configuration
//! - **switch**: switching to already installed versions

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

mod cli;
mod sources;
mod switch;

/// Scratch `$HOME` and working directory for one tgswitch invocation.
pub struct TestEnv {
    home: TempDir,
    work: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let home = TempDir::new().unwrap();
        let work = home.path().join("project");
        fs::create_dir_all(&work).unwrap();
        Self {
            home,
            work,
        }
    }

    pub fn home(&self) -> &Path {
        self.home.path()
    }

    pub fn work(&self) -> &Path {
        &self.work
    }

    pub fn bin_path(&self) -> PathBuf {
        self.home().join("bin").join("terragrunt")
    }

    pub fn install_dir(&self) -> PathBuf {
        self.home().join(".terragrunt.versions")
    }

    /// Write `content` to `name` in the working directory.
    pub fn write(&self, name: &str, content: &str) {
        fs::write(self.work.join(name), content).unwrap();
    }

    /// Place a fake binary for `version` in the install directory.
    pub fn install_fake(&self, version: &str) -> PathBuf {
        fs::create_dir_all(self.install_dir()).unwrap();
        let path = self.install_dir().join(format!("terragrunt_{version}"));
        fs::write(&path, format!("#!/bin/sh\necho {version}\n")).unwrap();
        path
    }

    /// A `tgswitch` command isolated from the caller's environment, reading
    /// from the working directory and linking into the scratch bin path.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("tgswitch").unwrap();
        cmd.env("HOME", self.home())
            .env("USERPROFILE", self.home())
            .env("NO_COLOR", "1")
            .env("TGSWITCH_NO_PROGRESS", "1")
            .env_remove("TG_VERSION")
            .env_remove("GITHUB_AUTH_TOKEN")
            .env_remove("TGS_PREFER_LOCAL")
            .env_remove("RUST_LOG")
            .arg("-c")
            .arg(&self.work)
            .arg("-b")
            .arg(self.bin_path());
        cmd
    }
}
