//! Core request and error types for batch extraction
//!
//! Batch-level failures reject the whole call; everything else is captured
//! per listing inside its `ProductRecord`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::page_extractor::schema::ErrorResponse;
use crate::render_session::SessionError;

/// Fatal, whole-call failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BatchError {
    /// Request failed shape validation; no session was opened
    #[error("{0}")]
    InvalidRequest(String),

    /// Remote session could not be acquired; no listing was attempted
    #[error(transparent)]
    SessionConnect(#[from] SessionError),
}

impl BatchError {
    #[must_use]
    pub const fn is_invalid_request(&self) -> bool {
        matches!(self, Self::InvalidRequest(_))
    }

    /// Wire shape for callers, `{ "error": "..." }`
    #[must_use]
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
        }
    }
}

/// Convenience alias for Result with `BatchError`
pub type BatchResult<T> = Result<T, BatchError>;

/// Validated, ordered list of listing URLs
///
/// Order is significant: the response is index-aligned with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequest {
    urls: Vec<String>,
}

impl BatchRequest {
    /// Validate request shape
    ///
    /// Entries are trimmed. Individual URLs are not checked for well-formedness
    /// here; a malformed URL fails only its own record.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` when the list is empty, longer than `max_batch_size`,
    /// or contains a blank entry.
    pub fn new(urls: Vec<String>, max_batch_size: usize) -> BatchResult<Self> {
        if urls.is_empty() {
            return Err(BatchError::InvalidRequest("No urls provided".to_string()));
        }

        if urls.len() > max_batch_size {
            return Err(BatchError::InvalidRequest(format!(
                "Too many urls: {} (maximum {max_batch_size})",
                urls.len()
            )));
        }

        let urls = urls
            .into_iter()
            .enumerate()
            .map(|(index, url)| {
                let trimmed = url.trim();
                if trimmed.is_empty() {
                    Err(BatchError::InvalidRequest(format!("Url at index {index} is empty")))
                } else {
                    Ok(trimmed.to_string())
                }
            })
            .collect::<BatchResult<Vec<_>>>()?;

        Ok(Self { urls })
    }

    #[must_use]
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    #[must_use]
    pub fn into_urls(self) -> Vec<String> {
        self.urls
    }
}
