use clap::Parser;
use octocheese::core::OctoError;
use octocheese::format_error_with_help;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

/// Copy PyPI packages to GitHub Releases
#[derive(Parser)]
#[command(name = "octocheese")]
#[command(about = "Copy PyPI packages to GitHub Releases")]
#[command(version)]
struct Cli {
    /// The name of the project on PyPI (defaults to the repository name)
    #[arg(value_name = "PYPI_NAME", env = "INPUT_PYPI_NAME")]
    pypi_name: Option<String>,

    /// The token to authenticate with the GitHub API
    #[arg(short, long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,

    /// The repository name (in the format <owner>/<name>) or the complete URL
    /// (e.g. https://github.com/octocheese/octocheese). Defaults to the
    /// 'origin' remote of the current directory.
    #[arg(short, long, env = "GITHUB_REPOSITORY")]
    repo: Option<String>,

    /// Don't show information about OctoCheese at the bottom of the release message
    #[arg(long)]
    no_self_promotion: bool,

    /// The maximum number of tags to process, starting with the most recent
    #[arg(
        long,
        value_name = "N",
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    max_tags: Option<usize>,

    /// Changelog text to include in every release message
    #[arg(long, default_value = "")]
    changelog: String,

    /// Show the complete error detail when something goes wrong
    #[arg(short = 'T', long)]
    traceback: bool,

    /// Use this configuration file instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Invalid credentials and a bad repository are usage errors
fn exit_code_for(err: &OctoError) -> u8 {
    match err {
        OctoError::Authentication(_) | OctoError::InvalidRepository(_) => 2,
        _ => 1,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let traceback = cli.traceback;

    let result = cli::sync::run(cli::sync::SyncCommandOptions {
        pypi_name: cli.pypi_name.filter(|name| !name.trim().is_empty()),
        token: cli.token.into(),
        repo: cli.repo.filter(|repo| !repo.trim().is_empty()),
        no_self_promotion: cli.no_self_promotion,
        max_tags: cli.max_tags,
        changelog: cli.changelog,
        traceback,
        config: cli.config,
    })
    .await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\n{}", format_error_with_help(&e, traceback));
            ExitCode::from(exit_code_for(&e))
        }
    }
}
