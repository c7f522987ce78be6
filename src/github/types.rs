//! Data types for the GitHub Actions REST API.
//!
//! Everything here derives `Serialize` and `Deserialize` matching the JSON
//! shapes returned by the `actions/runs` endpoints. Enum values GitHub adds
//! after this crate was written deserialize into the `Unknown` catch-alls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a workflow run, job, or step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Queued,
    InProgress,
    Completed,
    Waiting,
    Requested,
    Pending,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Queued => write!(f, "queued"),
            Status::InProgress => write!(f, "in_progress"),
            Status::Completed => write!(f, "completed"),
            Status::Waiting => write!(f, "waiting"),
            Status::Requested => write!(f, "requested"),
            Status::Pending => write!(f, "pending"),
            Status::Unknown => write!(f, "unknown"),
        }
    }
}

/// Terminal conclusion of a run, job, or step. Only meaningful once the
/// status is `completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conclusion {
    Success,
    Failure,
    Cancelled,
    Skipped,
    TimedOut,
    ActionRequired,
    Neutral,
    Stale,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for Conclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conclusion::Success => write!(f, "success"),
            Conclusion::Failure => write!(f, "failure"),
            Conclusion::Cancelled => write!(f, "cancelled"),
            Conclusion::Skipped => write!(f, "skipped"),
            Conclusion::TimedOut => write!(f, "timed_out"),
            Conclusion::ActionRequired => write!(f, "action_required"),
            Conclusion::Neutral => write!(f, "neutral"),
            Conclusion::Stale => write!(f, "stale"),
            Conclusion::Unknown => write!(f, "unknown"),
        }
    }
}

/// State of a single workflow run, fetched fresh on every poll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRun {
    pub id: u64,
    /// Workflow name, e.g. "CI".
    pub name: Option<String>,
    pub status: Status,
    pub conclusion: Option<Conclusion>,
    pub html_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One job within a workflow run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: u64,
    pub name: String,
    /// Absent in some API responses; callers must substitute a fallback.
    pub html_url: Option<String>,
    pub status: Status,
    pub conclusion: Option<Conclusion>,
    /// Steps in execution order, preserved exactly as returned.
    #[serde(default)]
    pub steps: Vec<Step>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// One step within a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub name: String,
    pub number: u32,
    pub status: Status,
    pub conclusion: Option<Conclusion>,
}

/// Envelope returned by the jobs-listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct JobsResponse {
    pub total_count: u32,
    pub jobs: Vec<Job>,
}
