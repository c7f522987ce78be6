//! Configuration loaded from `runwait.toml`.
//!
//! Fields missing from the file fall back to defaults. The `GITHUB_TOKEN`
//! environment variable takes precedence over the file for the token.

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

/// Top-level configuration loaded from `runwait.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct RunwaitConfig {
    /// GitHub token used for API calls.
    #[serde(default)]
    pub token: String,

    /// Repository to query, `owner/name`. Detected from the `origin`
    /// remote when absent.
    #[serde(default)]
    pub repo: Option<String>,

    /// Overall budget for awaiting a run, in seconds.
    #[serde(default = "default_run_timeout_secs")]
    pub run_timeout_secs: u64,

    /// Pause between run-state polls, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Budget for resolving the active job URL, in milliseconds.
    #[serde(default = "default_job_url_timeout_ms")]
    pub job_url_timeout_ms: u64,
}

fn default_run_timeout_secs() -> u64 {
    300
}

fn default_poll_interval_ms() -> u64 {
    2500
}

fn default_job_url_timeout_ms() -> u64 {
    60_000
}

impl Default for RunwaitConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            repo: None,
            run_timeout_secs: default_run_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            job_url_timeout_ms: default_job_url_timeout_ms(),
        }
    }
}

impl RunwaitConfig {
    /// Load the configuration from `runwait.toml` in the current directory.
    /// Uses defaults if the file does not exist.
    pub fn load() -> Result<Self> {
        let path = Path::new("runwait.toml");
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<RunwaitConfig>(&contents)?
        } else {
            Self::default()
        };

        // Environment variable takes precedence over the file for the token.
        if let Ok(token) = std::env::var("GITHUB_TOKEN")
            && !token.is_empty()
        {
            config.token = token;
        }

        Ok(config)
    }
}
