//! Bounded retry for remote calls that are expected to flake.
//!
//! [`Retry`] wraps an async operation with a wall-clock budget: any failure
//! is logged and retried after a fixed pause until an attempt succeeds or
//! the budget runs out. The budget is measured once, from the first attempt;
//! it is not reset per attempt.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::time::{self, Instant};

/// Pause between a failed attempt and the next one.
const RETRY_INTERVAL: Duration = Duration::from_secs(1);

/// Label used in diagnostics when the caller supplied none.
const ANONYMOUS_LABEL: &str = "anonymous function";

/// Outcome of a retry-wrapped operation.
///
/// Intermediate failures are absorbed; the only unsuccessful outcome is
/// `TimedOut`, and the error details that led to it live in the warning
/// logs, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryResult<T> {
    Success(T),
    TimedOut,
}

/// Builder for a retry-wrapped call.
///
/// The warning sink defaults to `tracing::warn!`; tests swap it for a
/// collector to count emissions.
pub struct Retry {
    label: Option<String>,
    interval: Duration,
    warn: Box<dyn Fn(&str) + Send + Sync>,
}

impl Default for Retry {
    fn default() -> Self {
        Self::new()
    }
}

impl Retry {
    pub fn new() -> Self {
        Self {
            label: None,
            interval: RETRY_INTERVAL,
            warn: Box::new(|message| tracing::warn!("{message}")),
        }
    }

    /// Name the wrapped operation for diagnostics.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Override the pause between attempts.
    #[allow(dead_code)]
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Replace the warning sink.
    pub fn warn_with(mut self, warn: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.warn = Box::new(warn);
        self
    }

    /// Run `operation` until it succeeds or `timeout` elapses.
    ///
    /// Each attempt races the deadline: a success that settles first wins
    /// regardless of how long it took, and once the deadline fires the
    /// in-flight attempt is dropped. Attempts never overlap; the next one
    /// starts only after the previous one settled and the pause elapsed.
    pub async fn run<T, E, F, Fut>(&self, timeout: Duration, mut operation: F) -> RetryResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let deadline = Instant::now() + timeout;
        loop {
            tokio::select! {
                result = operation() => match result {
                    Ok(value) => return RetryResult::Success(value),
                    Err(err) => {
                        let name = self.label.as_deref().unwrap_or(ANONYMOUS_LABEL);
                        (self.warn)(&format!("retrying {name} after an error:\n  {err}"));
                    }
                },
                _ = time::sleep_until(deadline) => return RetryResult::TimedOut,
            }
            tokio::select! {
                _ = time::sleep(self.interval) => {}
                _ = time::sleep_until(deadline) => return RetryResult::TimedOut,
            }
        }
    }
}
