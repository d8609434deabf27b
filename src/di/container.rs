//! Service container for dependency injection

use super::traits::{GitHubProvider, IndexProvider};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::core::{OctoResult, Secret};
use crate::github::client::GitHubClient;
use crate::pypi::client::PyPiClient;
use std::sync::Arc;

/// Service container for dependency injection
///
/// Holds the configuration, the GitHub and PyPI clients and the clock behind
/// trait objects so tests can swap in mocks and a fixed time.
#[derive(Clone)]
pub struct ServiceContainer {
    pub config: Config,
    pub github: Arc<dyn GitHubProvider>,
    pub index: Arc<dyn IndexProvider>,
    pub clock: Arc<dyn Clock>,
}

impl ServiceContainer {
    /// Create a new service container with production implementations
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built (for example when
    /// the token contains characters not allowed in a header).
    pub fn new(config: Config, token: &Secret) -> OctoResult<Self> {
        let github = GitHubClient::new(&config, token)?;
        let index = PyPiClient::new(&config)?;

        Ok(Self {
            github: Arc::new(github),
            index: Arc::new(index),
            clock: Arc::new(SystemClock),
            config,
        })
    }

    /// Create a service container with custom provider implementations
    ///
    /// This is primarily useful for testing, where you can inject mock
    /// implementations of each service.
    pub fn with_providers(
        config: Config,
        github: Arc<dyn GitHubProvider>,
        index: Arc<dyn IndexProvider>,
    ) -> Self {
        Self {
            config,
            github,
            index,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Get the GitHub provider
    pub fn github(&self) -> &dyn GitHubProvider {
        self.github.as_ref()
    }

    /// Get the package index provider
    pub fn index(&self) -> &dyn IndexProvider {
        self.index.as_ref()
    }
}
