use crate::core::{OctoError, OctoResult};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// A GitHub repository, `owner/name`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse a repository identifier.
    ///
    /// Accepts `owner/name`, `https://github.com/owner/name` and the SSH form
    /// `git@github.com:owner/name`, each with an optional trailing `.git`.
    pub fn parse(input: &str) -> OctoResult<Self> {
        let invalid = || OctoError::InvalidRepository(input.to_string());
        let trimmed = input.trim().trim_end_matches('/');

        let path = if trimmed.contains("://") {
            let url = url::Url::parse(trimmed).map_err(|_| invalid())?;
            url.path().trim_matches('/').to_string()
        } else if let Some((_, path)) = trimmed.strip_prefix("git@").and_then(|s| s.split_once(':'))
        {
            path.trim_matches('/').to_string()
        } else {
            trimmed.to_string()
        };

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let (owner, name) = match segments.as_slice() {
            [.., owner, name] => (*owner, *name),
            _ => return Err(invalid()),
        };

        // `owner/name` without a scheme must be exactly two segments
        if !trimmed.contains("://") && !trimmed.starts_with("git@") && segments.len() != 2 {
            return Err(invalid());
        }

        let name = name.strip_suffix(".git").unwrap_or(name);

        if owner.is_empty()
            || name.is_empty()
            || owner.chars().chain(name.chars()).any(char::is_whitespace)
        {
            return Err(invalid());
        }

        Ok(Self::new(owner, name))
    }

    /// The repository behind the `origin` remote of a working copy.
    ///
    /// `path` may be anywhere inside the work tree; the repository is found
    /// the way git itself finds it, including `.git` files that point
    /// elsewhere. Fails with `OctoError::InvalidRepository` when no repository
    /// is found or it has no `origin` remote.
    pub fn from_git_remote(path: &Path) -> OctoResult<Self> {
        let repo = gix::discover(path).map_err(|e| {
            tracing::debug!("git discovery failed: {}", e);
            OctoError::InvalidRepository(format!("{} is not a git repository", path.display()))
        })?;

        let url = repo
            .find_remote("origin")
            .ok()
            .and_then(|remote| {
                remote
                    .url(gix::remote::Direction::Fetch)
                    .map(|url| url.to_bstring().to_string())
            })
            .ok_or_else(|| {
                OctoError::InvalidRepository(format!(
                    "no 'origin' remote in {}",
                    repo.git_dir().display()
                ))
            })?;

        Self::parse(&url)
    }

    /// `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoRef {
    type Err = OctoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
