//! Locates the job a workflow run is currently executing.
//!
//! Right after a run is triggered its job list is eventually consistent:
//! jobs appear with a delay, and a short job may already be finished by the
//! first look. The resolver probes the list until it can hand back a URL
//! worth showing to a human.

use std::time::Duration;

use tokio::time::{self, Instant};

use crate::github::{GitHubError, Status, WorkflowRunApi};

/// Returned when a job matched but the API carried no URL for it.
pub const MISSING_JOB_URL: &str = "GitHub failed to return the URL";

/// Returned when no probe produced a URL before the deadline.
pub const JOB_URL_TIMED_OUT: &str = "Unable to fetch the job URL within the timeout";

const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_millis(2500);

pub struct ActiveJobResolver<'a, A> {
    api: &'a A,
    interval: Duration,
}

impl<'a, A: WorkflowRunApi> ActiveJobResolver<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            interval: DEFAULT_PROBE_INTERVAL,
        }
    }

    /// Override the pause between probes.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Single probe of the run's job list.
    ///
    /// Picks the first in-progress job, falling back to the first completed
    /// one (the run may have finished between trigger and probe). Jobs in
    /// other states are skipped. A match without a URL yields
    /// [`MISSING_JOB_URL`]; no match yields `None`. API failures propagate.
    pub async fn find_active_job_url(&self, run_id: u64) -> Result<Option<String>, GitHubError> {
        let jobs = self.api.run_jobs(run_id).await?;
        let job = jobs
            .iter()
            .find(|job| job.status == Status::InProgress)
            .or_else(|| jobs.iter().find(|job| job.status == Status::Completed));
        Ok(job.map(|job| {
            job.html_url
                .clone()
                .unwrap_or_else(|| MISSING_JOB_URL.to_string())
        }))
    }

    /// Probe until a URL turns up or `timeout` elapses.
    ///
    /// The deadline is measured from the first probe and is not reset per
    /// attempt. Probes never overlap; each waits for the previous one to
    /// settle plus one interval. On expiry the fixed [`JOB_URL_TIMED_OUT`]
    /// message is returned in place of a URL.
    pub async fn find_active_job_url_with_retry(
        &self,
        run_id: u64,
        timeout: Duration,
    ) -> Result<String, GitHubError> {
        let start = Instant::now();
        while start.elapsed() < timeout {
            if let Some(url) = self.find_active_job_url(run_id).await? {
                return Ok(url);
            }
            tracing::debug!(run_id, "no active job yet, next probe in {:?}", self.interval);
            time::sleep(self.interval).await;
        }
        Ok(JOB_URL_TIMED_OUT.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::github::{Job, WorkflowRun};

    fn job(id: u64, status: Status, url: Option<&str>) -> Job {
        Job {
            id,
            name: format!("job-{id}"),
            html_url: url.map(str::to_string),
            status,
            conclusion: None,
            steps: Vec::new(),
            started_at: None,
            completed_at: None,
        }
    }

    /// Serves one page of jobs per call, repeating the last page forever.
    struct JobPages {
        pages: Vec<Vec<Job>>,
        calls: AtomicUsize,
    }

    impl JobPages {
        fn new(pages: Vec<Vec<Job>>) -> Self {
            Self {
                pages,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl WorkflowRunApi for JobPages {
        async fn run_state(&self, _run_id: u64) -> Result<WorkflowRun, GitHubError> {
            unimplemented!("the resolver never fetches run state")
        }

        async fn run_jobs(&self, _run_id: u64) -> Result<Vec<Job>, GitHubError> {
            let i = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.pages[i.min(self.pages.len() - 1)].clone())
        }
    }

    struct BrokenApi;

    impl WorkflowRunApi for BrokenApi {
        async fn run_state(&self, _run_id: u64) -> Result<WorkflowRun, GitHubError> {
            unimplemented!("the resolver never fetches run state")
        }

        async fn run_jobs(&self, _run_id: u64) -> Result<Vec<Job>, GitHubError> {
            Err(GitHubError::UnexpectedStatus {
                operation: "list workflow run jobs",
                expected: 200,
                actual: 500,
            })
        }
    }

    #[tokio::test]
    async fn in_progress_job_wins_over_completed() {
        let api = JobPages::new(vec![vec![
            job(1, Status::Completed, Some("https://example.test/1")),
            job(2, Status::InProgress, Some("https://example.test/2")),
            job(3, Status::InProgress, Some("https://example.test/3")),
        ]]);
        let url = ActiveJobResolver::new(&api)
            .find_active_job_url(42)
            .await
            .unwrap();
        assert_eq!(url.as_deref(), Some("https://example.test/2"));
    }

    #[tokio::test]
    async fn falls_back_to_the_first_completed_job() {
        let api = JobPages::new(vec![vec![
            job(1, Status::Queued, Some("https://example.test/1")),
            job(2, Status::Completed, Some("https://example.test/2")),
            job(3, Status::Completed, Some("https://example.test/3")),
        ]]);
        let url = ActiveJobResolver::new(&api)
            .find_active_job_url(42)
            .await
            .unwrap();
        assert_eq!(url.as_deref(), Some("https://example.test/2"));
    }

    #[tokio::test]
    async fn no_running_or_finished_job_yields_none() {
        let api = JobPages::new(vec![vec![
            job(1, Status::Queued, Some("https://example.test/1")),
            job(2, Status::Waiting, None),
        ]]);
        let url = ActiveJobResolver::new(&api)
            .find_active_job_url(42)
            .await
            .unwrap();
        assert_eq!(url, None);
    }

    #[tokio::test]
    async fn matched_job_without_url_gets_the_fallback_text() {
        let api = JobPages::new(vec![vec![job(1, Status::InProgress, None)]]);
        let url = ActiveJobResolver::new(&api)
            .find_active_job_url(42)
            .await
            .unwrap();
        assert_eq!(url.as_deref(), Some(MISSING_JOB_URL));
    }

    #[tokio::test]
    async fn repeated_probes_of_an_unchanged_list_agree() {
        let api = JobPages::new(vec![vec![
            job(1, Status::Completed, Some("https://example.test/1")),
            job(2, Status::Completed, Some("https://example.test/2")),
        ]]);
        let resolver = ActiveJobResolver::new(&api);
        let first = resolver.find_active_job_url(42).await.unwrap();
        let second = resolver.find_active_job_url(42).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.as_deref(), Some("https://example.test/1"));
    }

    #[tokio::test(start_paused = true)]
    async fn polling_stops_at_the_first_probe_that_finds_a_job() {
        let api = JobPages::new(vec![
            vec![],
            vec![],
            vec![job(1, Status::InProgress, Some("https://example.test/1"))],
        ]);
        let url = ActiveJobResolver::new(&api)
            .find_active_job_url_with_retry(42, Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(url, "https://example.test/1");
        assert_eq!(api.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn polling_gives_up_with_the_timeout_message() {
        let api = JobPages::new(vec![vec![]]);
        let start = Instant::now();
        let url = ActiveJobResolver::new(&api)
            .find_active_job_url_with_retry(42, Duration::from_secs(10))
            .await
            .unwrap();
        assert_eq!(url, JOB_URL_TIMED_OUT);
        // Probes at 0s, 2.5s, 5s and 7.5s; the loop exits at the 10s mark.
        assert_eq!(api.calls(), 4);
        assert_eq!(start.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn api_failures_propagate_out_of_the_polling_loop() {
        let api = BrokenApi;
        let err = ActiveJobResolver::new(&api)
            .find_active_job_url_with_retry(42, Duration::from_secs(10))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("received 500"));
    }
}
