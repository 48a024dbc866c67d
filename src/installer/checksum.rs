//! SHA-256 verification of downloaded release assets.
//!
//! Terragrunt releases publish a `SHA256SUMS` manifest next to the binaries:
//!
//! ```text
//! 4c8d...e1f2  terragrunt_linux_amd64
//! 9a0b...77c3  terragrunt_darwin_arm64
//! ```
//!
//! Older releases have no manifest; verification is then skipped with a
//! warning rather than failing the switch.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::{debug, warn};

use crate::core::TgswitchError;

/// Hex-encoded SHA-256 of a byte slice.
#[must_use]
pub fn sha256_hex(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

/// Hex-encoded SHA-256 of a file.
///
/// # Errors
///
/// Fails if the file cannot be read.
pub async fn compute_sha256(path: &Path) -> Result<String> {
    let contents = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(sha256_hex(&contents))
}

/// Find the checksum for `asset` in a `SHA256SUMS` manifest.
#[must_use]
pub fn find_checksum(manifest: &str, asset: &str) -> Option<String> {
    manifest.lines().find_map(|line| {
        let mut parts = line.split_whitespace();
        let (checksum, filename) = (parts.next()?, parts.next()?);
        // `sha256sum -b` marks binary mode with a leading '*'
        (filename.trim_start_matches('*') == asset).then(|| checksum.to_lowercase())
    })
}

/// Compare a file against an expected checksum.
///
/// # Errors
///
/// [`TgswitchError::ChecksumMismatch`] if the digests differ.
pub async fn verify_file(path: &Path, asset: &str, expected: &str) -> Result<()> {
    let actual = compute_sha256(path).await?;
    if !actual.eq_ignore_ascii_case(expected) {
        return Err(TgswitchError::ChecksumMismatch {
            file: asset.to_string(),
            expected: expected.to_string(),
            actual,
        }
        .into());
    }

    debug!("Checksum verified for {asset}");
    Ok(())
}

/// Download the release manifest and return the checksum for `asset`.
///
/// Returns `Ok(None)` when the manifest is unavailable or does not list the
/// asset.
///
/// # Errors
///
/// Fails only when the manifest response body cannot be read.
pub async fn fetch_expected_checksum(
    client: &reqwest::Client,
    manifest_url: &str,
    asset: &str,
) -> Result<Option<String>> {
    debug!("Fetching checksums from: {manifest_url}");

    let response = match client.get(manifest_url).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!("Failed to fetch checksums file: {e}");
            return Ok(None);
        }
    };

    if !response.status().is_success() {
        warn!("Failed to fetch checksums file: HTTP {}", response.status());
        return Ok(None);
    }

    let manifest = response.text().await.context("Failed to read checksums file content")?;
    let checksum = find_checksum(&manifest, asset);
    if checksum.is_none() {
        warn!("No checksum found for {asset}");
    }
    Ok(checksum)
}
