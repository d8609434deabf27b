//! Trait definitions for dependency injection

use crate::core::OctoResult;
use crate::github::repo::RepoRef;
use crate::github::types::{
    GitHubRelease, GitHubRepo, GitHubTag, RateLimit, ReleaseAsset, ReleaseDraft,
};
use crate::pypi::types::IndexReleaseMap;
use async_trait::async_trait;
use std::path::Path;

/// Trait for package index operations
///
/// Provides the version -> files map for a project and raw file downloads.
#[async_trait]
pub trait IndexProvider: Send + Sync {
    /// Files published for every version of a package.
    ///
    /// Failures are logged by the implementation and produce an empty map.
    async fn fetch_releases(&self, package_name: &str) -> IndexReleaseMap;

    /// Download a file to `dest`
    async fn download_file(&self, url: &str, dest: &Path) -> OctoResult<()>;
}

/// Trait for GitHub repository and release operations
///
/// An invalid token must surface as `OctoError::Authentication` from any
/// method.
#[async_trait]
pub trait GitHubProvider: Send + Sync {
    /// Check the token; returns the authenticated login
    async fn verify_credentials(&self) -> OctoResult<String>;

    /// Get the core rate limit bucket
    async fn rate_limit(&self) -> OctoResult<RateLimit>;

    /// Get repository information
    async fn get_repo(&self, repo: &RepoRef) -> OctoResult<GitHubRepo>;

    /// Get tags, newest first, at most `limit` of them
    async fn list_tags(&self, repo: &RepoRef, limit: Option<usize>)
        -> OctoResult<Vec<GitHubTag>>;

    /// Get the release for a tag, `None` if it has none
    async fn get_release_by_tag(
        &self,
        repo: &RepoRef,
        tag_name: &str,
    ) -> OctoResult<Option<GitHubRelease>>;

    /// Create a release
    async fn create_release(&self, repo: &RepoRef, draft: &ReleaseDraft)
        -> OctoResult<GitHubRelease>;

    /// Edit an existing release
    async fn update_release(
        &self,
        repo: &RepoRef,
        release_id: u64,
        draft: &ReleaseDraft,
    ) -> OctoResult<GitHubRelease>;

    /// List a release's assets
    async fn list_assets(&self, repo: &RepoRef, release_id: u64) -> OctoResult<Vec<ReleaseAsset>>;

    /// Upload a new asset to a release
    async fn upload_asset(
        &self,
        repo: &RepoRef,
        release: &GitHubRelease,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> OctoResult<ReleaseAsset>;
}
