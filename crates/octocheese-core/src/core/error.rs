use thiserror::Error;

pub type OctoResult<T> = Result<T, OctoError>;

#[derive(Error, Debug)]
pub enum OctoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Path error: {0}")]
    Path(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version error: {0}")]
    Version(String),

    /// The repository identifier could not be split into owner and name.
    #[error("Invalid repository '{0}': expected <owner>/<name> or a GitHub URL")]
    InvalidRepository(String),

    /// GitHub rejected the token. Nothing further will succeed.
    #[error("Invalid credentials for GitHub REST API: {0}")]
    Authentication(String),

    /// The API quota is spent; every further call would be refused until reset.
    #[error("GitHub API rate limit exceeded. Resets in {reset} seconds.")]
    RateLimited { reset: u64 },

    #[error("GitHub API error: HTTP {status} - {message}")]
    GitHub { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unable to download '{url}': HTTP {status}")]
    Download { url: String, status: u16 },

    /// Downloaded bytes do not hash to the checksum published by the index.
    #[error("The checksums for {filename} do not match! (expected {expected}, got {actual})")]
    ChecksumMismatch {
        filename: String,
        expected: String,
        actual: String,
    },

    #[error("Package index error: {0}")]
    Index(String),
}

impl OctoError {
    /// Whether this error means the rest of the run cannot succeed.
    ///
    /// Credential failures and an exhausted rate limit qualify; everything else
    /// is scoped to a single file or tag and is logged and skipped by the caller.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            OctoError::Authentication(_) | OctoError::RateLimited { .. }
        )
    }
}
