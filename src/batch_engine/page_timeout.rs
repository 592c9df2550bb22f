//! Timeout utilities for page operations
//!
//! Provides async timeout wrappers to prevent indefinite hangs during
//! page navigation, loading, and other browser operations.

use std::future::Future;
use std::time::Duration;

use crate::render_session::PageError;

/// Helper function to wrap async page operations with explicit timeout
///
/// Prevents indefinite hangs on page operations by applying `tokio::time::timeout`.
/// Returns errors distinguishing between timeout and operation failures.
///
/// # Arguments
/// * `operation` - The async Future to execute with a timeout
/// * `timeout` - Timeout duration
/// * `operation_name` - Human-readable name for error messages
///
/// # Returns
/// * `Ok(T)` - Operation completed successfully
/// * `Err` - Either the operation failed or `PageError::Timeout`
pub async fn with_page_timeout<F, T>(
    operation: F,
    timeout: Duration,
    operation_name: &str,
) -> Result<T, PageError>
where
    F: Future<Output = Result<T, PageError>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(PageError::Timeout {
            operation: operation_name.to_string(),
            after: timeout,
        }),
    }
}

/// Bound `operation` by an absolute batch deadline, if one is set
pub async fn with_batch_deadline<F, T>(
    operation: F,
    deadline: Option<tokio::time::Instant>,
) -> Result<T, PageError>
where
    F: Future<Output = Result<T, PageError>>,
{
    match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, operation)
            .await
            .unwrap_or(Err(PageError::BatchDeadlineExceeded)),
        None => operation.await,
    }
}
