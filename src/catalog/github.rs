//! Catalog provider backed by the GitHub Releases API.

use anyhow::Result;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::ExponentialBackoff;
use tracing::debug;

use super::{CatalogProvider, dedupe_preserving_order};
use crate::config::Settings;
use crate::constants::{
    GITHUB_API_URL, HTTP_TIMEOUT, MAX_BACKOFF_DELAY_MS, MAX_FETCH_RETRIES, MAX_RELEASE_PAGES,
    REPO_NAME, REPO_OWNER, RELEASES_PER_PAGE, STARTING_BACKOFF_DELAY_MS,
};
use crate::core::TgswitchError;

#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
    #[serde(default)]
    draft: bool,
}

/// One page of the releases API.
#[derive(Debug, Default, PartialEq, Eq)]
struct ReleasePage {
    /// Releases on the page, drafts included; a short page is the last one.
    release_count: usize,
    versions: Vec<String>,
}

/// Lists Terragrunt versions from the release tags of the upstream repository.
///
/// Pages of [`RELEASES_PER_PAGE`] releases are requested until a short page
/// comes back (bounded by [`MAX_RELEASE_PAGES`]). Each page request is retried
/// with exponential backoff. Draft releases are skipped and the leading `v` of
/// each tag is removed.
///
/// # Examples
///
/// ```rust,no_run
/// use tgswitch::catalog::{CatalogProvider, GithubReleases};
/// use tgswitch::config::Settings;
///
/// # async fn example() -> anyhow::Result<()> {
/// let settings = Settings::from_env()?;
/// let catalog = GithubReleases::new(&settings)?.versions().await?;
/// println!("{} versions available", catalog.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GithubReleases {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl GithubReleases {
    /// Creates a provider for the upstream repository.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be constructed.
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build().map_err(|e| {
            TgswitchError::NetworkError {
                operation: "create HTTP client".to_string(),
                reason: Some(e.to_string()),
            }
        })?;

        Ok(Self {
            client,
            api_url: GITHUB_API_URL.to_string(),
            token: settings.github_token.clone(),
        })
    }

    /// Point the provider at a different API base URL.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    fn page_url(&self, page: usize) -> String {
        format!(
            "{}/repos/{REPO_OWNER}/{REPO_NAME}/releases?per_page={RELEASES_PER_PAGE}&page={page}",
            self.api_url
        )
    }

    async fn fetch_page(&self, page: usize) -> Result<ReleasePage, TgswitchError> {
        let retry_strategy = ExponentialBackoff::from_millis(STARTING_BACKOFF_DELAY_MS)
            .max_delay(Duration::from_millis(MAX_BACKOFF_DELAY_MS))
            .factor(2)
            .take(MAX_FETCH_RETRIES);

        let url = self.page_url(page);

        Retry::spawn(retry_strategy, || {
            let client = self.client.clone();
            let url = url.clone();
            let token = self.token.clone();
            async move { request_page(&client, &url, token.as_deref()).await }
        })
        .await
    }
}

impl CatalogProvider for GithubReleases {
    async fn versions(&self) -> Result<Vec<String>> {
        let mut versions = Vec::new();

        for page in 1..=MAX_RELEASE_PAGES {
            let ReleasePage {
                release_count,
                versions: tags,
            } = self.fetch_page(page).await?;
            debug!("Fetched {release_count} releases from page {page}");
            versions.extend(tags);

            if release_count < RELEASES_PER_PAGE {
                break;
            }
        }

        Ok(dedupe_preserving_order(versions))
    }
}

async fn request_page(
    client: &reqwest::Client,
    url: &str,
    token: Option<&str>,
) -> Result<ReleasePage, TgswitchError> {
    let network_error = |reason: String| TgswitchError::NetworkError {
        operation: format!("GET {url}"),
        reason: Some(reason),
    };

    let mut request = client
        .get(url)
        .header(USER_AGENT, env!("CARGO_PKG_NAME"))
        .header(ACCEPT, "application/vnd.github+json");
    if let Some(token) = token {
        request = request.header(AUTHORIZATION, format!("Bearer {token}"));
    }

    let response = request.send().await.map_err(|e| network_error(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(network_error(format!("HTTP {status}")));
    }

    let body = response.text().await.map_err(|e| network_error(e.to_string()))?;
    parse_release_page(&body).map_err(|e| network_error(format!("unexpected response: {e}")))
}

/// Extract version strings from one page of the releases API.
fn parse_release_page(body: &str) -> Result<ReleasePage, serde_json::Error> {
    let releases: Vec<Release> = serde_json::from_str(body)?;
    Ok(ReleasePage {
        release_count: releases.len(),
        versions: releases
            .into_iter()
            .filter(|release| !release.draft)
            .map(|release| {
                release.tag_name.strip_prefix('v').unwrap_or(&release.tag_name).to_string()
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_release_page() {
        let body = r#"[
            {"tag_name": "v0.38.4", "draft": false, "prerelease": false},
            {"tag_name": "v0.39.0-beta1", "draft": false, "prerelease": true},
            {"tag_name": "v0.40.0", "draft": true},
            {"tag_name": "0.38.3"}
        ]"#;
        let page = parse_release_page(body).unwrap();
        assert_eq!(page.release_count, 4);
        assert_eq!(page.versions, ["0.38.4", "0.39.0-beta1", "0.38.3"]);
    }

    #[test]
    fn test_parse_release_page_rejects_garbage() {
        assert!(parse_release_page("{\"message\": \"Not Found\"}").is_err());
        assert_eq!(parse_release_page("[]").unwrap(), ReleasePage::default());
    }

    #[test]
    fn test_page_url() {
        let provider = GithubReleases::new(&Settings::with_home(PathBuf::from("/home/user")))
            .unwrap()
            .with_api_url("http://localhost:8080/");
        assert_eq!(
            provider.page_url(2),
            "http://localhost:8080/repos/gruntwork-io/terragrunt/releases?per_page=100&page=2"
        );
    }
}
