//! Create or update the GitHub release for one tag and copy its files

use crate::clock::Clock;
use crate::core::version::{is_prerelease, release_version};
use crate::core::{OctoError, OctoResult};
use crate::di::traits::{GitHubProvider, IndexProvider};
use crate::di::ServiceContainer;
use crate::github::repo::RepoRef;
use crate::github::types::{GitHubRelease, ReleaseDraft};
use crate::pypi::types::FileDescriptor;
use crate::release::checksum::verify_sha256;
use crate::release::message::compose;
use crate::release::staleness::StalenessPolicy;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// What happened to the release itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseAction {
    Created,
    Updated,
    /// Existing release older than the staleness threshold; left untouched
    SkippedStale,
}

/// Outcome of syncing a single tag
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub release: GitHubRelease,
    pub action: ReleaseAction,
    pub uploaded: Vec<String>,
    pub already_present: Vec<String>,
    pub failed: Vec<String>,
}

impl SyncReport {
    fn new(release: GitHubRelease, action: ReleaseAction) -> Self {
        Self {
            release,
            action,
            uploaded: Vec::new(),
            already_present: Vec::new(),
            failed: Vec::new(),
        }
    }
}

/// Content type for an uploaded distribution file
pub fn content_type_for(filename: &str) -> &'static str {
    let lower = filename.to_ascii_lowercase();
    if lower.ends_with(".whl") || lower.ends_with(".zip") || lower.ends_with(".egg") {
        "application/zip"
    } else if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
        "application/gzip"
    } else if lower.ends_with(".tar.bz2") {
        "application/x-bzip2"
    } else {
        "application/octet-stream"
    }
}

/// Release updater
///
/// Idempotent: running it twice for the same tag and files leaves one release
/// with one asset per filename.
pub struct ReleaseUpdater {
    github: Arc<dyn GitHubProvider>,
    index: Arc<dyn IndexProvider>,
    clock: Arc<dyn Clock>,
    staleness: StalenessPolicy,
}

impl ReleaseUpdater {
    pub fn new(
        github: Arc<dyn GitHubProvider>,
        index: Arc<dyn IndexProvider>,
        clock: Arc<dyn Clock>,
        staleness: StalenessPolicy,
    ) -> Self {
        Self {
            github,
            index,
            clock,
            staleness,
        }
    }

    /// Build an updater from the container's providers and configuration
    pub fn from_container(container: &ServiceContainer) -> Self {
        Self::new(
            container.github.clone(),
            container.index.clone(),
            container.clock.clone(),
            container.config.staleness_policy(),
        )
    }

    /// Make the release for `tag_name` reflect the index release and copy
    /// the index files it does not have yet.
    ///
    /// Failures while fetching, creating or editing the release are returned.
    /// Failures for individual files are logged and recorded in the report,
    /// except authentication errors which are returned immediately.
    pub async fn sync(
        &self,
        repo: &RepoRef,
        tag_name: &str,
        package_name: &str,
        changelog: &str,
        self_promotion: bool,
        files: &[FileDescriptor],
    ) -> OctoResult<SyncReport> {
        let version = release_version(tag_name);
        let prerelease = is_prerelease(tag_name);
        let now = self.clock.now();

        let draft = ReleaseDraft {
            tag_name: tag_name.to_string(),
            name: format!("Version {}", version),
            body: compose(package_name, version, self.clock.today(), changelog, self_promotion),
            prerelease,
        };

        let (release, action, mut current_assets) =
            match self.github.get_release_by_tag(repo, tag_name).await? {
                Some(existing) => {
                    if self.staleness.is_stale(&existing, now) {
                        tracing::info!(
                            "Release for '{}' has not been updated recently. Skipping.",
                            tag_name
                        );
                        return Ok(SyncReport::new(existing, ReleaseAction::SkippedStale));
                    }

                    tracing::info!("Updating release for '{}'", tag_name);
                    let updated = self.github.update_release(repo, existing.id, &draft).await?;
                    let assets: HashSet<String> = self
                        .github
                        .list_assets(repo, updated.id)
                        .await?
                        .into_iter()
                        .map(|a| a.name)
                        .collect();
                    (updated, ReleaseAction::Updated, assets)
                }
                None => {
                    tracing::info!("Creating release for '{}'", tag_name);
                    let created = self.github.create_release(repo, &draft).await?;
                    (created, ReleaseAction::Created, HashSet::new())
                }
            };

        let mut report = SyncReport::new(release, action);
        if files.is_empty() {
            return Ok(report);
        }

        let tmp_dir = tempfile::Builder::new().prefix("octocheese-").tempdir()?;

        for file in files {
            let filename = file.filename();

            if current_assets.contains(&filename) {
                tracing::info!(
                    "File '{}' already exists for release '{}'. Skipping.",
                    filename,
                    tag_name
                );
                report.already_present.push(filename);
                continue;
            }

            match self
                .copy_file(repo, &report.release, file, &filename, tmp_dir.path())
                .await
            {
                Ok(()) => {
                    current_assets.insert(filename.clone());
                    report.uploaded.push(filename);
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::error!("{} Skipping.", e);
                    report.failed.push(filename);
                }
            }
        }

        Ok(report)
    }

    /// Download, verify and upload one file
    async fn copy_file(
        &self,
        repo: &RepoRef,
        release: &GitHubRelease,
        file: &FileDescriptor,
        filename: &str,
        tmp_dir: &Path,
    ) -> OctoResult<()> {
        if filename.is_empty() {
            return Err(OctoError::Index(format!(
                "Cannot determine a filename for '{}'.",
                file.url
            )));
        }

        tracing::info!("Copying {} from PyPI", filename);
        let dest = tmp_dir.join(filename);
        self.index.download_file(&file.url, &dest).await?;

        let bytes = tokio::fs::read(&dest).await?;
        if let Some(expected) = &file.sha256 {
            verify_sha256(filename, &bytes, expected)?;
        }

        self.github
            .upload_asset(repo, release, filename, content_type_for(filename), bytes)
            .await?;
        tracing::debug!(release = %release.tag_name, file = filename, "Uploaded asset");

        Ok(())
    }
}
