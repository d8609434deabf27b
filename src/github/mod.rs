//! GitHub integration for release mirroring
//!
//! This module provides functionality for interacting with GitHub to:
//! - List repository tags, newest first
//! - Look up, create and edit releases
//! - List and upload release assets
//! - Parse `owner/name` repository identifiers and GitHub URLs

pub mod client;
pub mod repo;
pub mod types;

pub use client::GitHubClient;
pub use repo::RepoRef;
pub use types::{GitHubRelease, GitHubRepo, GitHubTag, RateLimit, ReleaseAsset, ReleaseDraft};
