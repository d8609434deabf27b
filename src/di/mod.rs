//! Dependency injection infrastructure for OctoCheese
//!
//! The synchronization code only talks to PyPI and GitHub through the
//! [`IndexProvider`] and [`GitHubProvider`] traits, so it can run against the
//! in-memory implementations in [`mocks`].
//!
//! # Example (Production)
//! ```no_run
//! use octocheese::config::Config;
//! use octocheese::di::ServiceContainer;
//! use octocheese::Secret;
//!
//! # fn example() -> octocheese::OctoResult<()> {
//! let container = ServiceContainer::new(Config::default(), &Secret::new("ghp_..."))?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example (Testing)
//! ```
//! use octocheese::config::Config;
//! use octocheese::di::{ServiceContainer, mocks::*};
//! use std::sync::Arc;
//!
//! let github = Arc::new(MockGitHubProvider::new());
//! let index = Arc::new(MockIndexProvider::new());
//!
//! let container = ServiceContainer::with_providers(Config::default(), github, index);
//! ```

pub mod container;
pub mod mocks;
pub mod traits;

// Re-export key types
pub use container::ServiceContainer;
pub use traits::{GitHubProvider, IndexProvider};
