//! Walk a repository's tags and sync the matching PyPI releases

use crate::core::version::release_version;
use crate::core::OctoResult;
use crate::di::traits::{GitHubProvider, IndexProvider};
use crate::di::ServiceContainer;
use crate::github::repo::RepoRef;
use crate::release::updater::{ReleaseAction, ReleaseUpdater};
use std::sync::Arc;

/// Options for one run
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Text placed under `### Changelog` in every release body
    pub changelog: String,
    /// PyPI project name; defaults to the repository name
    pub pypi_name: Option<String>,
    pub self_promotion: bool,
    /// Only consider this many of the newest tags
    pub max_tags: Option<usize>,
    /// Log the full error detail for tags that fail
    pub traceback: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            changelog: String::new(),
            pypi_name: None,
            self_promotion: true,
            max_tags: None,
            traceback: false,
        }
    }
}

/// Counts for a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub tags: usize,
    pub created: usize,
    pub updated: usize,
    /// Existing releases left alone by the staleness policy
    pub stale: usize,
    /// Tags with no PyPI release
    pub unmatched: usize,
    pub failed: usize,
    pub files_uploaded: usize,
    pub files_failed: usize,
}

/// Runs the release updater over every tag of a repository
pub struct Synchronizer {
    github: Arc<dyn GitHubProvider>,
    index: Arc<dyn IndexProvider>,
    updater: ReleaseUpdater,
}

impl Synchronizer {
    pub fn new(container: &ServiceContainer) -> Self {
        Self {
            github: container.github.clone(),
            index: container.index.clone(),
            updater: ReleaseUpdater::from_container(container),
        }
    }

    /// Sync every tag of `repo` that has a PyPI release.
    ///
    /// Errors for a single tag are logged and counted; authentication errors
    /// and a missing repository abort the run.
    pub async fn run(&self, repo: &RepoRef, options: &SyncOptions) -> OctoResult<RunSummary> {
        let package_name = options.pypi_name.as_deref().unwrap_or(&repo.name);

        let releases = self.index.fetch_releases(package_name).await;
        tracing::debug!(
            package = package_name,
            versions = releases.len(),
            "Loaded PyPI releases"
        );

        let github_repo = self.github.get_repo(repo).await?;
        tracing::debug!(repo = %github_repo.full_name, "Resolved repository");

        let tags = self.github.list_tags(repo, options.max_tags).await?;
        let mut summary = RunSummary {
            tags: tags.len(),
            ..RunSummary::default()
        };

        for tag in &tags {
            let version = release_version(&tag.name);

            let Some(files) = releases.get(version) else {
                tracing::warn!("No PyPI release found for tag '{}'. Skipping.", tag.name);
                summary.unmatched += 1;
                continue;
            };

            tracing::info!("Processing release for {}", version);

            let result = self
                .updater
                .sync(
                    repo,
                    &tag.name,
                    package_name,
                    &options.changelog,
                    options.self_promotion,
                    files,
                )
                .await;

            match result {
                Ok(report) => {
                    match report.action {
                        ReleaseAction::Created => summary.created += 1,
                        ReleaseAction::Updated => summary.updated += 1,
                        ReleaseAction::SkippedStale => summary.stale += 1,
                    }
                    summary.files_uploaded += report.uploaded.len();
                    summary.files_failed += report.failed.len();
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    if options.traceback {
                        tracing::error!("Failed to sync release for '{}': {:?}", tag.name, e);
                    } else {
                        tracing::error!("Failed to sync release for '{}': {}", tag.name, e);
                    }
                    summary.failed += 1;
                }
            }
        }

        tracing::info!(
            "Processed {} tags: {} created, {} updated, {} skipped, {} without a PyPI release, {} failed.",
            summary.tags,
            summary.created,
            summary.updated,
            summary.stale,
            summary.unmatched,
            summary.failed
        );

        Ok(summary)
    }
}
