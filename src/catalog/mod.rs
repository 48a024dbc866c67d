//! The catalog of upstream Terragrunt versions
//!
//! The switcher asks a [`CatalogProvider`] for the catalog at most once per
//! run, and only when the selected source actually needs it (an already
//! installed pinned version never triggers a request).
//!
//! The production provider is [`GithubReleases`].

pub mod github;

pub use github::GithubReleases;

use anyhow::Result;

/// Supplies every version known to be available upstream.
///
/// Entries are plain version strings without a `v` prefix, in no particular
/// order. The catalog may be empty.
#[allow(async_fn_in_trait)]
pub trait CatalogProvider {
    /// Fetch the catalog.
    ///
    /// # Errors
    ///
    /// [`TgswitchError::NetworkError`](crate::core::TgswitchError::NetworkError)
    /// when the upstream cannot be reached.
    async fn versions(&self) -> Result<Vec<String>>;
}

/// Whether `version` is listed in `catalog`.
#[must_use]
pub fn version_exists<S: AsRef<str>>(version: &str, catalog: &[S]) -> bool {
    catalog.iter().any(|entry| entry.as_ref() == version)
}

/// Remove repeated entries, keeping the first occurrence.
#[must_use]
pub fn dedupe_preserving_order(versions: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    versions.into_iter().filter(|version| seen.insert(version.clone())).collect()
}
