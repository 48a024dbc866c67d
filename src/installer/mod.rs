//! Installing Terragrunt binaries and switching the bin symlink
//!
//! Downloaded binaries live side by side in the install directory
//! (`~/.terragrunt.versions` by default) as `terragrunt_<version>`. Switching
//! versions never touches those files; it only re-points the bin symlink.
//!
//! # Install Flow
//!
//! 1. If `terragrunt_<version>` is not in the install directory, download the
//!    release asset for the current platform into a temporary file there.
//! 2. Verify it against the release `SHA256SUMS` when one is published.
//! 3. Mark it executable and rename it into place.
//! 4. Atomically replace the bin symlink.
//! 5. Record the version in the recent file.
//!
//! The [`Installer`] trait is the seam the switcher drives; [`BinaryInstaller`]
//! is the production implementation.

pub mod checksum;
pub mod recent;

pub use recent::RecentVersions;

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::constants::{
    CHECKSUMS_FILENAME, GITHUB_DOWNLOAD_URL, HTTP_TIMEOUT, REPO_NAME, REPO_OWNER, VERSION_PREFIX,
};
use crate::core::TgswitchError;
use crate::utils::fs::{ensure_dir, replace_symlink, set_executable};
use crate::utils::platform::{arch_name, exe_suffix, os_name, with_exe_suffix};
use crate::utils::progress::DownloadProgress;
use crate::version::is_valid_version;

/// Places a version's binary on disk and points the bin path at it.
#[allow(async_fn_in_trait)]
pub trait Installer {
    /// Whether the binary for `version` is already downloaded.
    fn is_installed(&self, version: &str) -> bool;

    /// Versions with a downloaded binary, in no particular order.
    ///
    /// # Errors
    ///
    /// Fails if the install directory exists but cannot be listed.
    fn installed_versions(&self) -> Result<Vec<String>>;

    /// Recently used versions, newest first.
    ///
    /// # Errors
    ///
    /// Fails if the recent file exists but cannot be read.
    fn recent_versions(&self) -> Result<Vec<String>>;

    /// Make `version` the one `bin_path` runs, downloading it if needed.
    ///
    /// Returns the path of the versioned binary.
    ///
    /// # Errors
    ///
    /// Download, verification and symlink failures.
    async fn install(&self, version: &str, bin_path: &Path) -> Result<PathBuf>;
}

/// Downloads release binaries from GitHub into the install directory.
#[derive(Debug, Clone)]
pub struct BinaryInstaller {
    install_dir: PathBuf,
    client: reqwest::Client,
    download_url: String,
    verify_checksums: bool,
    quiet: bool,
    recent: RecentVersions,
}

impl BinaryInstaller {
    /// Creates an installer for the install directory in `settings`.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be constructed.
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(env!("CARGO_PKG_NAME"))
            .build()
            .map_err(|e| TgswitchError::NetworkError {
                operation: "create HTTP client".to_string(),
                reason: Some(e.to_string()),
            })?;

        Ok(Self {
            recent: RecentVersions::new(&settings.install_dir),
            install_dir: settings.install_dir.clone(),
            client,
            download_url: GITHUB_DOWNLOAD_URL.to_string(),
            verify_checksums: true,
            quiet: false,
        })
    }

    /// Hide the download progress bar.
    #[must_use]
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Enable or disable `SHA256SUMS` verification.
    #[must_use]
    pub const fn verify_checksums(mut self, verify: bool) -> Self {
        self.verify_checksums = verify;
        self
    }

    /// Download release assets from a different host.
    #[must_use]
    pub fn with_download_url(mut self, url: impl Into<String>) -> Self {
        self.download_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// The install directory.
    #[must_use]
    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    /// The recent-versions file of this install directory.
    #[must_use]
    pub const fn recent(&self) -> &RecentVersions {
        &self.recent
    }

    /// Where the binary for `version` is stored.
    #[must_use]
    pub fn version_path(&self, version: &str) -> PathBuf {
        self.install_dir.join(with_exe_suffix(&format!("{VERSION_PREFIX}{version}")))
    }

    /// Release asset name for the current platform, e.g. `terragrunt_linux_amd64`.
    #[must_use]
    pub fn asset_name() -> String {
        format!("{VERSION_PREFIX}{}_{}{}", os_name(), arch_name(), exe_suffix())
    }

    fn release_url(&self, version: &str, file: &str) -> String {
        format!("{}/{REPO_OWNER}/{REPO_NAME}/releases/download/v{version}/{file}", self.download_url)
    }

    /// Download the asset for `version` and move it into the install directory.
    async fn download(&self, version: &str) -> Result<PathBuf> {
        ensure_dir(&self.install_dir)?;

        let asset = Self::asset_name();
        let url = self.release_url(version, &asset);
        let failed = || TgswitchError::DownloadFailed {
            version: version.to_string(),
            url: url.clone(),
        };

        info!("Downloading {url}");
        let mut response = self.client.get(&url).send().await.with_context(failed)?;
        if !response.status().is_success() {
            debug!("Download of {url} returned HTTP {}", response.status());
            return Err(failed().into());
        }

        let mut temp = tempfile::Builder::new()
            .prefix(&format!(".{VERSION_PREFIX}{version}."))
            .tempfile_in(&self.install_dir)
            .with_context(|| format!("Failed to create temp file in {}", self.install_dir.display()))?;

        let progress = DownloadProgress::new(
            response.content_length(),
            self.quiet,
            format!("Downloading terragrunt {version}"),
        );
        while let Some(chunk) = response.chunk().await.with_context(failed)? {
            temp.write_all(&chunk).context("Failed to write downloaded binary")?;
            progress.inc(chunk.len() as u64);
        }
        progress.finish();
        temp.as_file().sync_all().context("Failed to sync downloaded binary")?;

        if self.verify_checksums {
            let manifest_url = self.release_url(version, CHECKSUMS_FILENAME);
            match checksum::fetch_expected_checksum(&self.client, &manifest_url, &asset).await? {
                Some(expected) => checksum::verify_file(temp.path(), &asset, &expected).await?,
                None => warn!("No checksum available for {asset} {version}, skipping verification"),
            }
        }

        set_executable(temp.path())?;

        let destination = self.version_path(version);
        temp.persist(&destination)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to move binary to {}", destination.display()))?;

        debug!("Installed {}", destination.display());
        Ok(destination)
    }
}

impl Installer for BinaryInstaller {
    fn is_installed(&self, version: &str) -> bool {
        self.version_path(version).is_file()
    }

    fn installed_versions(&self) -> Result<Vec<String>> {
        if !self.install_dir.is_dir() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&self.install_dir)
            .with_context(|| format!("Failed to list {}", self.install_dir.display()))?;

        let mut versions = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };

            let version = name
                .strip_prefix(VERSION_PREFIX)
                .map(|rest| rest.strip_suffix(exe_suffix()).unwrap_or(rest));
            if let Some(version) = version
                && is_valid_version(version)
                && entry.path().is_file()
            {
                versions.push(version.to_string());
            }
        }
        Ok(versions)
    }

    fn recent_versions(&self) -> Result<Vec<String>> {
        self.recent.load()
    }

    async fn install(&self, version: &str, bin_path: &Path) -> Result<PathBuf> {
        let version_path = if self.is_installed(version) {
            debug!("terragrunt {version} already downloaded");
            self.version_path(version)
        } else {
            self.download(version).await?
        };

        replace_symlink(&version_path, bin_path)?;

        if let Err(e) = self.recent.add(version) {
            warn!("Unable to update {}: {e:#}", self.recent.path().display());
        }

        Ok(version_path)
    }
}
