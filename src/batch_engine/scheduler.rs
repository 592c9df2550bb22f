//! Bounded worker pool over a batch of listing URLs
//!
//! `pool_size` workers share a single cursor of unclaimed indices. A worker
//! claims the next index, runs that listing's pipeline to completion, and
//! claims again until the backlog is empty or the batch deadline passes.
//! Each pipeline runs in its own task so a panic fails only its record.

use futures::future::join_all;
use log::{debug, error};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::aggregator::ResultSlots;
use super::pipeline::{PipelineContext, process_listing};
use crate::page_extractor::schema::ProductRecord;
use crate::render_session::{PageError, RenderSession};

/// Scheduling knobs for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub pool_size: usize,
    pub pacing_delay: Option<Duration>,
}

/// Run every URL through the pipeline with at most `pool_size` in flight
///
/// Returns only after every claimed pipeline has finished or faulted.
pub async fn run_pool<S: RenderSession>(
    session: Arc<S>,
    ctx: Arc<PipelineContext>,
    urls: Arc<Vec<String>>,
    settings: PoolSettings,
) -> ResultSlots {
    let cursor = Arc::new(AtomicUsize::new(0));
    let workers = settings.pool_size.max(1).min(urls.len());
    debug!("Starting {workers} workers for {} urls", urls.len());

    let handles = (0..workers).map(|worker_id| {
        run_worker(
            worker_id,
            Arc::clone(&session),
            Arc::clone(&ctx),
            Arc::clone(&urls),
            Arc::clone(&cursor),
            settings.pacing_delay,
        )
    });

    let mut slots = ResultSlots::new(&urls);
    for (index, record) in join_all(handles).await.into_iter().flatten() {
        slots.fill(index, record);
    }
    slots
}

async fn run_worker<S: RenderSession>(
    worker_id: usize,
    session: Arc<S>,
    ctx: Arc<PipelineContext>,
    urls: Arc<Vec<String>>,
    cursor: Arc<AtomicUsize>,
    pacing_delay: Option<Duration>,
) -> Vec<(usize, ProductRecord)> {
    let mut completed = Vec::new();

    loop {
        if ctx.deadline_passed() {
            debug!("Worker {worker_id} stopping: batch deadline passed");
            break;
        }

        let index = cursor.fetch_add(1, Ordering::SeqCst);
        let Some(url) = urls.get(index).cloned() else {
            break;
        };
        debug!("Worker {worker_id} claimed index {index}: {url}");

        let task = tokio::spawn({
            let session = Arc::clone(&session);
            let ctx = Arc::clone(&ctx);
            let url = url.clone();
            async move { process_listing(session.as_ref(), &ctx, &url).await }
        });

        let record = match task.await {
            Ok(record) => record,
            Err(e) => {
                error!("Pipeline task for {url} panicked: {e}");
                ProductRecord::failed(url, PageError::TaskFailed(e.to_string()).to_string())
            }
        };
        completed.push((index, record));

        if let Some(delay) = pacing_delay
            && cursor.load(Ordering::SeqCst) < urls.len()
        {
            tokio::time::sleep(delay).await;
        }
    }

    completed
}
