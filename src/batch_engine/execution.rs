//! Batch and single-listing entry points
//!
//! Both entry points validate first, acquire exactly one session, and close
//! that session exactly once after all pipeline work has finished.

use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use super::batch_types::{BatchError, BatchRequest, BatchResult};
use super::pipeline::{PipelineContext, process_listing};
use super::scheduler::{PoolSettings, run_pool};
use crate::config::ScrapeConfig;
use crate::page_extractor::schema::{BatchResponse, ProductRecord};
use crate::render_session::{PageError, RenderBackend, RenderSession, SessionError};

/// Extract every URL in `urls`, in order
///
/// # Errors
///
/// `BatchError::InvalidRequest` when the list fails validation (no session is
/// opened), or `BatchError::SessionConnect` when no session could be acquired.
/// Per-listing failures are returned inside the response.
pub async fn scrape_batch<B: RenderBackend>(
    backend: &B,
    config: &ScrapeConfig,
    urls: Vec<String>,
) -> BatchResult<BatchResponse> {
    let request = BatchRequest::new(urls, config.max_batch_size())?;
    let batch_id = Uuid::new_v4();
    let start_time = Instant::now();
    info!(
        "[{batch_id}] Starting batch of {} urls (pool size {})",
        request.len(),
        config.pool_size()
    );

    let session = connect_session(backend, config, batch_id).await?;
    let deadline = config
        .batch_timeout()
        .map(|timeout| tokio::time::Instant::now() + timeout);
    let ctx = Arc::new(PipelineContext::from_config(config, deadline));
    let session = Arc::new(session);
    let urls = Arc::new(request.into_urls());

    let slots = run_pool(
        Arc::clone(&session),
        ctx,
        Arc::clone(&urls),
        PoolSettings {
            pool_size: config.pool_size(),
            pacing_delay: config.pacing_delay(),
        },
    )
    .await;

    close_session(session, batch_id).await;

    let missing = if deadline.is_some() {
        PageError::BatchDeadlineExceeded
    } else {
        PageError::TaskFailed("listing was never scheduled".to_string())
    };
    let response = slots.into_response(&missing);

    info!(
        "[{batch_id}] Batch completed in {:.2}s: {} ok, {} failed",
        start_time.elapsed().as_secs_f64(),
        response.len() - response.failed_count(),
        response.failed_count()
    );
    Ok(response)
}

/// Extract one URL without a worker pool
///
/// # Errors
///
/// Same as [`scrape_batch`].
pub async fn scrape_single<B: RenderBackend>(
    backend: &B,
    config: &ScrapeConfig,
    url: impl Into<String>,
) -> BatchResult<ProductRecord> {
    let request = BatchRequest::new(vec![url.into()], 1)?;
    let batch_id = Uuid::new_v4();
    let url = request.urls()[0].clone();
    info!("[{batch_id}] Extracting single listing {url}");

    let session = connect_session(backend, config, batch_id).await?;
    let deadline = config
        .batch_timeout()
        .map(|timeout| tokio::time::Instant::now() + timeout);
    let ctx = PipelineContext::from_config(config, deadline);

    let record = process_listing(&session, &ctx, &url).await;

    close_session(Arc::new(session), batch_id).await;
    Ok(record)
}

async fn connect_session<B: RenderBackend>(
    backend: &B,
    config: &ScrapeConfig,
    batch_id: Uuid,
) -> Result<B::Session, BatchError> {
    let timeout = config.connect_timeout();
    match tokio::time::timeout(timeout, backend.connect(config.endpoint())).await {
        Ok(Ok(session)) => {
            debug!("[{batch_id}] Render session acquired");
            Ok(session)
        }
        Ok(Err(e)) => {
            warn!("[{batch_id}] Failed to acquire render session: {e}");
            Err(e.into())
        }
        Err(_) => {
            warn!("[{batch_id}] Render session connect timed out after {timeout:?}");
            Err(SessionError::Connect(format!("timed out after {timeout:?}")).into())
        }
    }
}

/// Close the session once every pipeline has released it
async fn close_session<S: RenderSession>(session: Arc<S>, batch_id: Uuid) {
    match Arc::try_unwrap(session) {
        Ok(session) => {
            if let Err(e) = session.close().await {
                warn!("[{batch_id}] {e}");
            } else {
                debug!("[{batch_id}] Render session closed");
            }
        }
        Err(arc) => warn!(
            "[{batch_id}] Session still has {} strong references, cleanup will happen on drop",
            Arc::strong_count(&arc)
        ),
    }
}
