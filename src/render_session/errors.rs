//! Error types for remote render sessions and pages

use std::time::Duration;
use thiserror::Error;

/// Failures of the session as a whole
///
/// Any of these while acquiring a session is fatal for the batch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Endpoint is not a ws(s):// or http(s):// address
    #[error("Invalid render endpoint '{0}'")]
    InvalidEndpoint(String),

    /// `/json/version` lookup for an http(s) endpoint failed
    #[error("Failed to resolve render endpoint: {0}")]
    EndpointDiscovery(String),

    /// WebSocket connection to the remote browser failed
    #[error("Failed to connect to render session: {0}")]
    Connect(String),

    /// Closing the remote browser failed
    #[error("Failed to close render session: {0}")]
    Close(String),
}

/// Failures scoped to one page, and therefore to one listing
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("Invalid listing URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to open page: {0}")]
    Allocation(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("{operation} timeout after {after:?}")]
    Timeout { operation: String, after: Duration },

    #[error("Request interception failed: {0}")]
    Interception(String),

    /// A single content probe failed; callers treat this as an absent signal
    #[error("Probe failed: {0}")]
    Probe(String),

    #[error("Failed to close page: {0}")]
    Close(String),

    #[error("Batch deadline exceeded before extraction finished")]
    BatchDeadlineExceeded,

    #[error("Extraction task failed: {0}")]
    TaskFailed(String),
}

impl PageError {
    /// Whether another attempt on a fresh page could plausibly succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Allocation(_) | Self::Navigation(_) | Self::Timeout { .. }
        )
    }
}
