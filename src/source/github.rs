//! GitHub-backed release source.

use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use tracing::debug;

use crate::constants::{
    GITHUB_ACCEPT_HEADER, GITHUB_API_BASE, GITHUB_API_VERSION, GITHUB_API_VERSION_HEADER,
    REQUEST_TIMEOUT_SECS, USER_AGENT,
};
use crate::core::UpdateError;
use crate::source::{ReleaseSource, RemoteRelease};

/// [`ReleaseSource`] implementation backed by the GitHub REST API.
///
/// Queries `GET /repos/{owner}/{repo}/releases` with the recommended Accept
/// and API-version headers. A single page of up to 100 releases is fetched;
/// release histories deeper than that are outside the update window this
/// client cares about.
pub struct GithubReleaseSource {
    client: Client,
    api_base: String,
}

impl GithubReleaseSource {
    /// Create a source pointed at the public GitHub API.
    pub fn new() -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT_HEADER));
        default_headers.insert(
            HeaderName::from_static(GITHUB_API_VERSION_HEADER),
            HeaderValue::from_static(GITHUB_API_VERSION),
        );

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(default_headers)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("failed to construct HTTP client for release listing");

        Self {
            client,
            api_base: GITHUB_API_BASE.to_string(),
        }
    }

    /// Point the source at a different API base URL (GitHub Enterprise, or a
    /// local stub in tests).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

impl Default for GithubReleaseSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ReleaseSource for GithubReleaseSource {
    fn list_releases<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
    ) -> BoxFuture<'a, Result<Vec<RemoteRelease>, UpdateError>> {
        Box::pin(async move {
            let url = format!(
                "{}/repos/{owner}/{repo}/releases?per_page=100",
                self.api_base
            );
            debug!("querying release listing: {url}");

            let network_error = |err: reqwest::Error| UpdateError::NetworkError {
                operation: "list releases".to_string(),
                reason: err.to_string(),
            };

            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(network_error)?
                .error_for_status()
                .map_err(network_error)?;

            let releases: Vec<RemoteRelease> =
                response.json().await.map_err(network_error)?;

            debug!("found {} available releases for {owner}/{repo}", releases.len());
            Ok(releases)
        })
    }
}
