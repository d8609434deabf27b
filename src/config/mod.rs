use crate::core::path::config_file;
use crate::core::{OctoError, OctoResult};
use crate::release::staleness::StalenessPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the PyPI JSON API (`{pypi_url}/{package}/json`)
    #[serde(default = "default_pypi_url")]
    pub pypi_url: String,

    /// Base URL of the GitHub REST API
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,

    /// Releases last updated longer ago than this are left untouched.
    /// `0` disables the check, so every existing release is re-edited.
    #[serde(default = "default_stale_after_days")]
    pub stale_after_days: u32,

    /// Show information about OctoCheese at the bottom of the release message
    #[serde(default = "default_true")]
    pub self_promotion: bool,

    /// Only consider this many of the newest tags
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tags: Option<usize>,

    /// Per-request timeout for HTTP transfers, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_pypi_url() -> String {
    "https://pypi.org/pypi".to_string()
}

fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_stale_after_days() -> u32 {
    7
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pypi_url: default_pypi_url(),
            github_api_url: default_github_api_url(),
            stale_after_days: default_stale_after_days(),
            self_promotion: true,
            max_tags: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Load config from the platform-specific config directory, falling back to
    /// defaults if it doesn't exist
    ///
    /// Config locations:
    /// - Windows: %APPDATA%\octocheese\config.yaml
    /// - Linux: ~/.config/octocheese/config.yaml
    /// - macOS: ~/Library/Application Support/octocheese/config.yaml
    pub fn load() -> OctoResult<Self> {
        let config_path = config_file()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load config from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> OctoResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            OctoError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config: Config = serde_yaml::from_str(&content)?;

        Ok(config)
    }

    /// The staleness policy described by `stale_after_days`
    pub fn staleness_policy(&self) -> StalenessPolicy {
        StalenessPolicy::from_days(self.stale_after_days)
    }
}
