//! Drives a workflow run to completion from the outside.
//!
//! [`RunAwaiter`] polls the run state until GitHub reports it completed,
//! wrapping each fetch in [`Retry`] so transient API hiccups are logged and
//! absorbed rather than aborting the wait.

use std::time::Duration;

use tokio::time::{self, Instant};

use crate::github::{Conclusion, Status, WorkflowRunApi};
use crate::retry::{Retry, RetryResult};

pub const DEFAULT_RUN_TIMEOUT: Duration = Duration::from_secs(300);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2500);

/// Cap on the retry budget of any single state fetch.
const STATE_FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// How the wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The run reached a terminal state with this conclusion.
    Completed(Conclusion),
    /// The run was still going when the overall budget ran out.
    TimedOut,
}

pub struct RunAwaiter<'a, A> {
    api: &'a A,
    timeout: Duration,
    poll_interval: Duration,
}

impl<'a, A: WorkflowRunApi> RunAwaiter<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            timeout: DEFAULT_RUN_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the overall wall-clock budget.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the pause between state polls.
    pub fn poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Poll until the run completes or the budget elapses.
    ///
    /// The budget is measured from the first poll and is not reset per
    /// attempt. Each state fetch gets a retry budget of the remaining
    /// overall time, capped at one minute; exhausting it ends the wait.
    pub async fn await_completion(&self, run_id: u64) -> RunOutcome {
        let start = Instant::now();
        let api = self.api;
        while start.elapsed() < self.timeout {
            let remaining = self.timeout.saturating_sub(start.elapsed());
            let budget = remaining.min(STATE_FETCH_TIMEOUT);

            let fetched = Retry::new()
                .label("workflow run state fetch")
                .run(budget, move || api.run_state(run_id))
                .await;

            match fetched {
                RetryResult::Success(run) => {
                    tracing::debug!(run_id, status = %run.status, "polled run state");
                    if run.status == Status::Completed {
                        return RunOutcome::Completed(
                            run.conclusion.unwrap_or(Conclusion::Unknown),
                        );
                    }
                }
                RetryResult::TimedOut => return RunOutcome::TimedOut,
            }

            time::sleep(self.poll_interval).await;
        }
        RunOutcome::TimedOut
    }
}
