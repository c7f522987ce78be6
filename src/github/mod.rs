pub mod client;
pub mod error;
pub mod types;

pub use client::{GitHubClient, WorkflowRunApi};
pub use error::GitHubError;
pub use types::{Conclusion, Job, Status, Step, WorkflowRun};
