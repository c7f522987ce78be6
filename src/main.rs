mod awaiter;
mod cli;
mod config;
mod git;
mod github;
mod resolver;
mod retry;
mod ui;

use std::path::Path;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::Parser;

use awaiter::{RunAwaiter, RunOutcome};
use cli::{Cli, Command};
use config::RunwaitConfig;
use git::RepoSlug;
use github::{Conclusion, GitHubClient, WorkflowRunApi};
use resolver::ActiveJobResolver;
use ui::RunProgress;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = RunwaitConfig::load()?;
    let repo = resolve_repo(cli.repo.as_deref(), &config)?;
    if config.token.is_empty() {
        bail!("no GitHub token found; set GITHUB_TOKEN or add `token` to runwait.toml");
    }
    let client = GitHubClient::new(config.token.clone(), repo);

    match cli.command {
        Command::Await {
            run_id,
            timeout_secs,
            poll_interval_ms,
        } => {
            let timeout = Duration::from_secs(timeout_secs.unwrap_or(config.run_timeout_secs));
            let poll_interval =
                Duration::from_millis(poll_interval_ms.unwrap_or(config.poll_interval_ms));
            let job_url_timeout = Duration::from_millis(config.job_url_timeout_ms);
            await_run(&client, run_id, timeout, poll_interval, job_url_timeout).await
        }
        Command::Status { run_id } => show_status(&client, run_id).await,
        Command::JobUrl {
            run_id,
            timeout_secs,
            interval_ms,
        } => {
            let timeout = timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_millis(config.job_url_timeout_ms));
            show_job_url(&client, run_id, timeout, interval_ms.map(Duration::from_millis)).await
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "runwait=debug" } else { "runwait=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// CLI flag wins over the config file; otherwise fall back to the
/// `origin` remote of the current directory's repository.
fn resolve_repo(flag: Option<&str>, config: &RunwaitConfig) -> Result<RepoSlug> {
    if let Some(repo) = flag {
        return RepoSlug::parse(repo);
    }
    if let Some(repo) = config.repo.as_deref() {
        return RepoSlug::parse(repo);
    }
    RepoSlug::detect(Path::new("."))
}

async fn await_run(
    client: &GitHubClient,
    run_id: u64,
    timeout: Duration,
    poll_interval: Duration,
    job_url_timeout: Duration,
) -> Result<()> {
    let progress = RunProgress::start(run_id);

    // The job URL is a convenience for the human watching; failing to
    // resolve it must not fail the wait itself.
    match ActiveJobResolver::new(client)
        .find_active_job_url_with_retry(run_id, job_url_timeout)
        .await
    {
        Ok(url) => progress.job_url(&url),
        Err(err) => tracing::warn!("could not resolve the active job URL: {err}"),
    }

    let outcome = RunAwaiter::new(client)
        .timeout(timeout)
        .poll_interval(poll_interval)
        .await_completion(run_id)
        .await;
    progress.finish(&outcome);

    match outcome {
        RunOutcome::Completed(Conclusion::Success) => Ok(()),
        RunOutcome::Completed(conclusion) => {
            bail!("workflow run {run_id} concluded with {conclusion}")
        }
        RunOutcome::TimedOut => {
            bail!("workflow run {run_id} did not complete within {timeout:?}")
        }
    }
}

async fn show_status(client: &GitHubClient, run_id: u64) -> Result<()> {
    let run = client.run_state(run_id).await?;
    println!("{}", serde_json::to_string_pretty(&run)?);
    Ok(())
}

async fn show_job_url(
    client: &GitHubClient,
    run_id: u64,
    timeout: Duration,
    interval: Option<Duration>,
) -> Result<()> {
    let mut resolver = ActiveJobResolver::new(client);
    if let Some(interval) = interval {
        resolver = resolver.interval(interval);
    }
    let url = resolver.find_active_job_url_with_retry(run_id, timeout).await?;
    println!("{url}");
    Ok(())
}
