//! Mock implementations of service traits for testing

use super::traits::{GitHubProvider, IndexProvider};
use crate::core::{OctoError, OctoResult};
use crate::github::repo::RepoRef;
use crate::github::types::{
    GitHubRelease, GitHubRepo, GitHubTag, RateLimit, ReleaseAsset, ReleaseDraft, TagCommit,
};
use crate::pypi::types::{FileDescriptor, IndexReleaseMap};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Mock GitHub provider for testing
///
/// Keeps tags, releases and assets in memory and records every mutating call.
///
/// # Example
///
/// ```
/// use octocheese::di::mocks::MockGitHubProvider;
///
/// let github = MockGitHubProvider::new().with_tags(&["v1.0.1", "v1.0.0"]);
/// github.add_release("v1.0.0", "old notes", chrono::Utc::now());
///
/// assert_eq!(github.release("v1.0.0").unwrap().body(), "old notes");
/// assert!(github.release("v1.0.1").is_none());
/// ```
#[derive(Clone, Default)]
pub struct MockGitHubProvider {
    state: Arc<Mutex<GitHubState>>,
}

#[derive(Default)]
struct GitHubState {
    tags: Vec<String>,
    releases: HashMap<String, GitHubRelease>,
    assets: HashMap<u64, Vec<ReleaseAsset>>,
    created: Vec<String>,
    updated: Vec<String>,
    uploads: Vec<(String, String)>,
    tag_limits: Vec<Option<usize>>,
    reject_credentials: bool,
    fail_upload_with_auth: bool,
    fail_release_lookup: HashSet<String>,
    rate_limited: bool,
    next_id: u64,
}

impl GitHubState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn check_credentials(&self) -> OctoResult<()> {
        if self.reject_credentials {
            return Err(OctoError::Authentication("Bad credentials".to_string()));
        }
        Ok(())
    }

    fn check_quota(&self) -> OctoResult<()> {
        if self.rate_limited {
            return Err(OctoError::RateLimited { reset: 600 });
        }
        Ok(())
    }
}

impl MockGitHubProvider {
    /// Create a new mock GitHub provider with no tags
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the repository's tags, newest first
    pub fn with_tags(self, tags: &[&str]) -> Self {
        self.state.lock().unwrap().tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Make every call fail with an authentication error
    pub fn reject_credentials(&self) {
        self.state.lock().unwrap().reject_credentials = true;
    }

    /// Make asset uploads fail with an authentication error
    pub fn fail_uploads_with_auth(&self) {
        self.state.lock().unwrap().fail_upload_with_auth = true;
    }

    /// Make looking up the release for `tag` fail with a server error
    pub fn fail_release_lookup(&self, tag: &str) {
        self.state
            .lock()
            .unwrap()
            .fail_release_lookup
            .insert(tag.to_string());
    }

    /// Make release lookups fail as if the API quota were spent
    pub fn exhaust_rate_limit(&self) {
        self.state.lock().unwrap().rate_limited = true;
    }

    /// Add an existing release
    pub fn add_release(&self, tag: &str, body: &str, created_at: DateTime<Utc>) -> GitHubRelease {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        let release = GitHubRelease {
            id,
            tag_name: tag.to_string(),
            name: Some(format!("Version {}", tag.trim_start_matches('v'))),
            draft: false,
            prerelease: false,
            body: Some(body.to_string()),
            created_at,
            upload_url: format!("https://uploads.example/releases/{}/assets{{?name,label}}", id),
            assets: Vec::new(),
        };
        state.releases.insert(tag.to_string(), release.clone());
        state.assets.insert(id, Vec::new());
        release
    }

    /// Attach an asset to an existing release
    pub fn add_asset(&self, tag: &str, name: &str) {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        let release_id = state.releases[tag].id;
        state.assets.entry(release_id).or_default().push(ReleaseAsset {
            id,
            name: name.to_string(),
            size: 0,
            content_type: None,
        });
    }

    /// The release for a tag
    pub fn release(&self, tag: &str) -> Option<GitHubRelease> {
        self.state.lock().unwrap().releases.get(tag).cloned()
    }

    /// Asset names attached to the release for a tag
    pub fn asset_names(&self, tag: &str) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state
            .releases
            .get(tag)
            .and_then(|r| state.assets.get(&r.id))
            .map(|assets| assets.iter().map(|a| a.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Tags releases were created for, in call order
    pub fn created(&self) -> Vec<String> {
        self.state.lock().unwrap().created.clone()
    }

    /// Tags releases were edited for, in call order
    pub fn updated(&self) -> Vec<String> {
        self.state.lock().unwrap().updated.clone()
    }

    /// `(tag, filename)` for every upload, in call order
    pub fn uploads(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().uploads.clone()
    }

    /// The `limit` argument of every `list_tags` call
    pub fn tag_limits(&self) -> Vec<Option<usize>> {
        self.state.lock().unwrap().tag_limits.clone()
    }
}

#[async_trait]
impl GitHubProvider for MockGitHubProvider {
    async fn verify_credentials(&self) -> OctoResult<String> {
        self.state.lock().unwrap().check_credentials()?;
        Ok("octocat".to_string())
    }

    async fn rate_limit(&self) -> OctoResult<RateLimit> {
        self.state.lock().unwrap().check_credentials()?;
        Ok(RateLimit {
            limit: 5000,
            remaining: 5000,
            reset: 0,
        })
    }

    async fn get_repo(&self, repo: &RepoRef) -> OctoResult<GitHubRepo> {
        self.state.lock().unwrap().check_credentials()?;
        Ok(GitHubRepo {
            name: repo.name.clone(),
            full_name: repo.full_name(),
            default_branch: "master".to_string(),
            description: None,
        })
    }

    async fn list_tags(&self, _repo: &RepoRef, limit: Option<usize>) -> OctoResult<Vec<GitHubTag>> {
        let mut state = self.state.lock().unwrap();
        state.check_credentials()?;
        state.tag_limits.push(limit);
        let count = limit.unwrap_or(usize::MAX);
        Ok(state
            .tags
            .iter()
            .take(count)
            .map(|name| GitHubTag {
                name: name.clone(),
                commit: TagCommit {
                    sha: "0000000".to_string(),
                },
            })
            .collect())
    }

    async fn get_release_by_tag(
        &self,
        _repo: &RepoRef,
        tag_name: &str,
    ) -> OctoResult<Option<GitHubRelease>> {
        let state = self.state.lock().unwrap();
        state.check_credentials()?;
        state.check_quota()?;
        if state.fail_release_lookup.contains(tag_name) {
            return Err(OctoError::GitHub {
                status: 500,
                message: "Internal Server Error".to_string(),
            });
        }
        Ok(state.releases.get(tag_name).cloned())
    }

    async fn create_release(&self, _repo: &RepoRef, draft: &ReleaseDraft) -> OctoResult<GitHubRelease> {
        let mut state = self.state.lock().unwrap();
        state.check_credentials()?;
        if state.releases.contains_key(&draft.tag_name) {
            return Err(OctoError::GitHub {
                status: 422,
                message: "Validation Failed: already_exists".to_string(),
            });
        }

        let id = state.next_id();
        let release = GitHubRelease {
            id,
            tag_name: draft.tag_name.clone(),
            name: Some(draft.name.clone()),
            draft: false,
            prerelease: draft.prerelease,
            body: Some(draft.body.clone()),
            created_at: Utc::now(),
            upload_url: format!("https://uploads.example/releases/{}/assets{{?name,label}}", id),
            assets: Vec::new(),
        };
        state.releases.insert(draft.tag_name.clone(), release.clone());
        state.assets.insert(id, Vec::new());
        state.created.push(draft.tag_name.clone());
        Ok(release)
    }

    async fn update_release(
        &self,
        _repo: &RepoRef,
        release_id: u64,
        draft: &ReleaseDraft,
    ) -> OctoResult<GitHubRelease> {
        let mut state = self.state.lock().unwrap();
        state.check_credentials()?;
        let release = state
            .releases
            .values_mut()
            .find(|r| r.id == release_id)
            .ok_or_else(|| OctoError::NotFound(format!("Release {}", release_id)))?;

        release.name = Some(draft.name.clone());
        release.body = Some(draft.body.clone());
        release.prerelease = draft.prerelease;
        let release = release.clone();

        state.updated.push(release.tag_name.clone());
        Ok(release)
    }

    async fn list_assets(&self, _repo: &RepoRef, release_id: u64) -> OctoResult<Vec<ReleaseAsset>> {
        let state = self.state.lock().unwrap();
        state.check_credentials()?;
        Ok(state.assets.get(&release_id).cloned().unwrap_or_default())
    }

    async fn upload_asset(
        &self,
        _repo: &RepoRef,
        release: &GitHubRelease,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> OctoResult<ReleaseAsset> {
        let mut state = self.state.lock().unwrap();
        state.check_credentials()?;
        if state.fail_upload_with_auth {
            return Err(OctoError::Authentication("Bad credentials".to_string()));
        }

        let assets = state.assets.entry(release.id).or_default();
        if assets.iter().any(|a| a.name == filename) {
            return Err(OctoError::GitHub {
                status: 422,
                message: "Validation Failed: already_exists".to_string(),
            });
        }

        let id = state.next_id();
        let asset = ReleaseAsset {
            id,
            name: filename.to_string(),
            size: bytes.len() as u64,
            content_type: Some(content_type.to_string()),
        };
        state.assets.entry(release.id).or_default().push(asset.clone());
        state
            .uploads
            .push((release.tag_name.clone(), filename.to_string()));
        Ok(asset)
    }
}

/// Mock package index for testing
///
/// Serves a fixed release map and in-memory file contents.
///
/// # Example
///
/// ```
/// use octocheese::di::mocks::MockIndexProvider;
///
/// let index = MockIndexProvider::new();
/// index.add_file("1.0.0", "https://files.example/pkg-1.0.0.tar.gz", b"data", true);
///
/// assert_eq!(index.releases()["1.0.0"].len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockIndexProvider {
    releases: Arc<Mutex<IndexReleaseMap>>,
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    downloads: Arc<Mutex<Vec<PathBuf>>>,
    requested_packages: Arc<Mutex<Vec<String>>>,
}

impl MockIndexProvider {
    /// Create a new mock index with no releases
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a version with no files
    pub fn add_version(&self, version: &str) {
        self.releases
            .lock()
            .unwrap()
            .entry(version.to_string())
            .or_default();
    }

    /// Publish a file for a version.
    ///
    /// With `with_checksum` the descriptor carries the file's real SHA-256.
    pub fn add_file(&self, version: &str, url: &str, content: &[u8], with_checksum: bool) {
        let sha256 = with_checksum.then(|| crate::release::checksum::sha256_hex(content));
        self.add_descriptor(version, FileDescriptor::new(url, sha256));
        self.files
            .lock()
            .unwrap()
            .insert(url.to_string(), content.to_vec());
    }

    /// Publish a descriptor without (or with arbitrary) downloadable content
    pub fn add_descriptor(&self, version: &str, descriptor: FileDescriptor) {
        self.releases
            .lock()
            .unwrap()
            .entry(version.to_string())
            .or_default()
            .push(descriptor);
    }

    /// Serve `content` for `url`
    pub fn serve(&self, url: &str, content: &[u8]) {
        self.files
            .lock()
            .unwrap()
            .insert(url.to_string(), content.to_vec());
    }

    /// The current release map
    pub fn releases(&self) -> IndexReleaseMap {
        self.releases.lock().unwrap().clone()
    }

    /// Destination path of every successful download
    pub fn downloads(&self) -> Vec<PathBuf> {
        self.downloads.lock().unwrap().clone()
    }

    /// Package names passed to `fetch_releases`
    pub fn requested_packages(&self) -> Vec<String> {
        self.requested_packages.lock().unwrap().clone()
    }
}

#[async_trait]
impl IndexProvider for MockIndexProvider {
    async fn fetch_releases(&self, package_name: &str) -> IndexReleaseMap {
        self.requested_packages
            .lock()
            .unwrap()
            .push(package_name.to_string());
        self.releases.lock().unwrap().clone()
    }

    async fn download_file(&self, url: &str, dest: &Path) -> OctoResult<()> {
        let content = self
            .files
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| OctoError::Download {
                url: url.to_string(),
                status: 404,
            })?;

        std::fs::write(dest, content)?;
        self.downloads.lock().unwrap().push(dest.to_path_buf());
        Ok(())
    }
}
