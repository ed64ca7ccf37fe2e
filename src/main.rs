use std::path::PathBuf;

use anyhow::{Context, Result};
use autoreview::{
    AgentConfig, GitHubForge, PullRequestEvent, agent::DEFAULT_AGENT_CHECK_NAME,
    run_review_agent, setup_github_client,
};
use clap::Parser;

// Human-readable build info (for clap version display)
const BUILD_INFO_HUMAN: &str = env!("BUILD_INFO_HUMAN");

#[derive(Parser, Debug)]
#[command(name = "autoreview")]
#[command(
    about = "Reviews a pull request based on its CI check-runs - approves when everything is green, requests changes on failure, comments while checks are still running"
)]
#[command(long_version = BUILD_INFO_HUMAN)]
struct Cli {
    /// Path to the workflow event JSON file (defaults to $GITHUB_EVENT_PATH)
    #[arg(long = "event-path", value_name = "FILE")]
    event_path: Option<PathBuf>,

    /// Name of this agent's own check-run, excluded from evaluation
    #[arg(long = "check-name", value_name = "NAME", default_value = DEFAULT_AGENT_CHECK_NAME)]
    check_name: String,

    /// Evaluate and print the decision without posting a review
    #[arg(long = "dry-run")]
    dry_run: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn init_tracing(debug: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let default_filter = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn event_file_path(cli: &Cli) -> Result<PathBuf> {
    if let Some(path) = &cli.event_path {
        return Ok(path.clone());
    }

    std::env::var("GITHUB_EVENT_PATH")
        .map(PathBuf::from)
        .context("GITHUB_EVENT_PATH is not set")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let event = PullRequestEvent::from_file(event_file_path(&cli)?)?;
    let forge = GitHubForge::new(setup_github_client()?);

    let config = AgentConfig {
        check_name: cli.check_name,
        dry_run: cli.dry_run,
    };

    let outcome = run_review_agent(&forge, &event, &config).await?;

    if !outcome.posted {
        println!(
            "would post {} review: {}",
            outcome.review.event.as_str(),
            outcome.review.body
        );
    }

    Ok(())
}
