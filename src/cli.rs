//! Command-line interface, built on clap.

use clap::{Parser, Subcommand};

/// Awaits a remote GitHub Actions workflow run.
#[derive(Debug, Parser)]
#[command(name = "runwait", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Repository to query, `owner/name`. Detected from the `origin`
    /// remote when omitted.
    #[arg(long, global = true)]
    pub repo: Option<String>,

    /// Enable verbose output.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Await completion of a workflow run and report its conclusion.
    Await {
        /// Numeric id of the workflow run.
        run_id: u64,

        /// Overall budget in seconds.
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Pause between run-state polls, in milliseconds.
        #[arg(long)]
        poll_interval_ms: Option<u64>,
    },

    /// Show the current state of a workflow run.
    Status {
        /// Numeric id of the workflow run.
        run_id: u64,
    },

    /// Resolve the URL of the job the run is currently executing.
    JobUrl {
        /// Numeric id of the workflow run.
        run_id: u64,

        /// Budget in seconds for the URL to turn up.
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Pause between probes of the job list, in milliseconds.
        #[arg(long)]
        interval_ms: Option<u64>,
    },
}
