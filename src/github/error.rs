//! Error types for the GitHub Actions API client.

use thiserror::Error;

/// Errors surfaced while talking to the GitHub Actions API.
///
/// A non-200 response is a hard failure carrying the operation name and both
/// the expected and received status codes; retrying it is the caller's
/// decision, not the client's.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// The API answered with a status code other than the expected one.
    #[error("{operation}: expected status {expected}, received {actual}")]
    UnexpectedStatus {
        operation: &'static str,
        expected: u16,
        actual: u16,
    },

    /// Underlying transport failure (DNS, refused connection, timeout) or an
    /// undecodable response body.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}
