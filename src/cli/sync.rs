use octocheese::config::Config;
use octocheese::core::OctoResult;
use octocheese::di::ServiceContainer;
use octocheese::github::repo::RepoRef;
use octocheese::sync::{SyncOptions, Synchronizer};
use octocheese::Secret;
use std::env;
use std::path::PathBuf;

pub struct SyncCommandOptions {
    pub pypi_name: Option<String>,
    pub token: Secret,
    pub repo: Option<String>,
    pub no_self_promotion: bool,
    pub max_tags: Option<usize>,
    pub changelog: String,
    pub traceback: bool,
    pub config: Option<PathBuf>,
}

pub async fn run(options: SyncCommandOptions) -> OctoResult<()> {
    let config = match &options.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let repo = match &options.repo {
        Some(repo) => RepoRef::parse(repo)?,
        None => RepoRef::from_git_remote(&env::current_dir()?)?,
    };

    let sync_options = SyncOptions {
        changelog: options.changelog,
        pypi_name: options.pypi_name,
        self_promotion: config.self_promotion && !options.no_self_promotion,
        max_tags: options.max_tags.or(config.max_tags),
        traceback: options.traceback,
    };

    let container = ServiceContainer::new(config, &options.token)?;
    let github = container.github();

    let login = github.verify_credentials().await?;
    tracing::debug!("Authenticated as {}", login);

    let before = github.rate_limit().await?;
    tracing::info!("{} requests available.", before.remaining);

    Synchronizer::new(&container).run(&repo, &sync_options).await?;

    let after = github.rate_limit().await?;
    tracing::info!(
        "Used {} requests. {} remaining.",
        before.remaining.saturating_sub(after.remaining),
        after.remaining
    );

    Ok(())
}
