use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use super::error::GitHubError;
use super::types::{Job, JobsResponse, WorkflowRun};
use crate::git::RepoSlug;

const API_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("runwait/", env!("CARGO_PKG_VERSION"));

/// Read access to a repository's workflow runs.
///
/// [`GitHubClient`] is the production implementation; tests substitute their
/// own mocks.
pub trait WorkflowRunApi {
    /// Fetch the current state of a single workflow run.
    async fn run_state(&self, run_id: u64) -> Result<WorkflowRun, GitHubError>;

    /// List the run's jobs, in the order the API returns them.
    async fn run_jobs(&self, run_id: u64) -> Result<Vec<Job>, GitHubError>;
}

pub struct GitHubClient {
    token: String,
    client: Client,
    base_url: String,
    repo: RepoSlug,
}

impl GitHubClient {
    pub fn new(token: String, repo: RepoSlug) -> Self {
        Self::with_base_url(token, repo, API_URL.to_string())
    }

    /// Create a client pointing at a custom base URL (useful for testing).
    pub fn with_base_url(token: String, repo: RepoSlug, base_url: String) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        Self {
            token,
            client,
            base_url,
            repo,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        operation: &'static str,
    ) -> Result<T, GitHubError> {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(&self.token)
            .header("accept", "application/vnd.github+json")
            .header("x-github-api-version", API_VERSION)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(GitHubError::UnexpectedStatus {
                operation,
                expected: 200,
                actual: status.as_u16(),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

impl WorkflowRunApi for GitHubClient {
    async fn run_state(&self, run_id: u64) -> Result<WorkflowRun, GitHubError> {
        let path = format!("/repos/{}/actions/runs/{run_id}", self.repo);
        self.get_json(&path, "fetch workflow run").await
    }

    async fn run_jobs(&self, run_id: u64) -> Result<Vec<Job>, GitHubError> {
        let path = format!("/repos/{}/actions/runs/{run_id}/jobs", self.repo);
        let response: JobsResponse = self.get_json(&path, "list workflow run jobs").await?;
        tracing::debug!(run_id, total = response.total_count, "listed workflow run jobs");
        Ok(response.jobs)
    }
}
