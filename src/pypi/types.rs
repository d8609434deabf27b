//! PyPI JSON API type definitions

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Files published on the index, keyed by version, in the index's order.
pub type IndexReleaseMap = IndexMap<String, Vec<FileDescriptor>>;

/// A distribution file to copy to GitHub
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub url: String,
    /// Hex SHA-256 digest, exactly as published by the index
    pub sha256: Option<String>,
}

impl FileDescriptor {
    pub fn new(url: impl Into<String>, sha256: Option<String>) -> Self {
        Self {
            url: url.into(),
            sha256,
        }
    }

    /// The asset name on GitHub: the final path segment of the URL.
    ///
    /// Two descriptors with the same filename are the same asset.
    pub fn filename(&self) -> String {
        match url::Url::parse(&self.url) {
            Ok(parsed) => parsed
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .unwrap_or_default()
                .to_string(),
            Err(_) => self
                .url
                .split(['?', '#'])
                .next()
                .and_then(|path| path.rsplit('/').next())
                .unwrap_or_default()
                .to_string(),
        }
    }
}

/// `GET /pypi/{project}/json`
#[derive(Debug, Deserialize)]
pub(crate) struct ProjectResponse {
    #[serde(default)]
    pub releases: IndexMap<String, Vec<ReleaseFile>>,
}

/// One entry of `releases[version]`
#[derive(Debug, Deserialize)]
pub(crate) struct ReleaseFile {
    pub url: String,
    #[serde(default)]
    pub digests: Option<Digests>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Digests {
    #[serde(default)]
    pub sha256: Option<String>,
}

impl From<ProjectResponse> for IndexReleaseMap {
    fn from(response: ProjectResponse) -> Self {
        response
            .releases
            .into_iter()
            .map(|(version, files)| {
                let files = files
                    .into_iter()
                    .map(|file| FileDescriptor {
                        sha256: file.digests.and_then(|d| d.sha256),
                        url: file.url,
                    })
                    .collect();
                (version, files)
            })
            .collect()
    }
}
