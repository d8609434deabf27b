//! PyPI JSON API client implementation

use crate::config::Config;
use crate::core::{OctoError, OctoResult};
use crate::di::traits::IndexProvider;
use crate::pypi::types::{IndexReleaseMap, ProjectResponse};
use async_trait::async_trait;
use reqwest::{header, Client as HttpClient};
use std::path::Path;
use std::time::Duration;

/// Client for the PyPI JSON API and file host
pub struct PyPiClient {
    http_client: HttpClient,
    base_url: String,
}

impl PyPiClient {
    /// Create a new PyPI client
    pub fn new(config: &Config) -> OctoResult<Self> {
        let http_client = HttpClient::builder()
            .user_agent(concat!("octocheese/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OctoError::Index(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.pypi_url.trim_end_matches('/').to_string(),
        })
    }

    /// Versions and files published for a project.
    ///
    /// Never fails: a missing project, an HTTP error or an unexpected payload
    /// is logged as a warning and yields an empty map.
    pub async fn fetch_releases(&self, package_name: &str) -> IndexReleaseMap {
        match self.try_fetch_releases(package_name).await {
            Ok(releases) => {
                tracing::debug!(
                    package = package_name,
                    versions = releases.len(),
                    "Fetched releases from PyPI"
                );
                releases
            }
            Err(e) => {
                tracing::warn!(
                    "Unable to get package data from PyPI for '{}': {}",
                    package_name,
                    e
                );
                IndexReleaseMap::new()
            }
        }
    }

    async fn try_fetch_releases(&self, package_name: &str) -> OctoResult<IndexReleaseMap> {
        let url = format!(
            "{}/{}/json",
            self.base_url,
            urlencoding::encode(package_name)
        );

        let response = self
            .http_client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(OctoError::Index(format!("HTTP {}", response.status())));
        }

        let body = response.bytes().await?;
        let project: ProjectResponse = serde_json::from_slice(&body)?;

        Ok(project.into())
    }

    /// Download a file to `dest`.
    ///
    /// A non-2xx status is reported as [`OctoError::Download`].
    pub async fn download_file(&self, url: &str, dest: &Path) -> OctoResult<()> {
        tracing::debug!(url, dest = %dest.display(), "Downloading");

        let response = self.http_client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(OctoError::Download {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        tokio::fs::write(dest, &bytes).await?;

        Ok(())
    }
}

// Implement IndexProvider trait
#[async_trait]
impl IndexProvider for PyPiClient {
    async fn fetch_releases(&self, package_name: &str) -> IndexReleaseMap {
        Self::fetch_releases(self, package_name).await
    }

    async fn download_file(&self, url: &str, dest: &Path) -> OctoResult<()> {
        Self::download_file(self, url, dest).await
    }
}
