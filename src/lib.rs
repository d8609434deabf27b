//! OctoCheese: copy PyPI packages to GitHub Releases
//!
//! For every tag of a GitHub repository that matches a version published on
//! PyPI, OctoCheese creates (or refreshes) the GitHub release and uploads the
//! distribution files from PyPI as release assets, verifying their SHA-256
//! checksums on the way.
//!
//! The crate re-exports the shared types from `octocheese-core`.

pub use octocheese_core::{format_error_with_help, ErrorHelp, OctoError, OctoResult, Secret};

/// Core module re-exported from octocheese-core.
pub mod core {
    pub use octocheese_core::core::*;
}

/// Configuration management.
pub mod config;

/// Injectable clock.
pub mod clock;

/// Dependency injection infrastructure.
pub mod di;

/// PyPI JSON API client.
pub mod pypi;

/// GitHub REST API client.
pub mod github;

/// Per-release synchronization: message, staleness, checksums, updater.
pub mod release;

/// Tag iteration across a repository.
pub mod sync;
