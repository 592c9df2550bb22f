//! Per-listing fetch-and-extract pipeline
//!
//! One call handles one URL end to end: open a page, attach the request
//! policy, navigate, extract, close. Every failure is converted into an
//! isolated failed record here; nothing escapes to sibling listings.

use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use super::fetcher::fetch_page;
use super::page_guard::PageGuard;
use super::page_timeout::with_batch_deadline;
use super::request_filter::RequestPolicy;
use crate::config::ScrapeConfig;
use crate::page_extractor::extract;
use crate::page_extractor::probes::ExtractionPlan;
use crate::page_extractor::schema::ProductRecord;
use crate::render_session::{NavigationOptions, PageError, RenderPage, RenderSession};
use crate::utils::{RETRY_BACKOFF_MS, is_valid_url};

/// Everything a pipeline needs besides the session, shared read-only
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub plan: ExtractionPlan,
    pub policy: Option<Arc<RequestPolicy>>,
    pub navigation: NavigationOptions,
    pub deadline: Option<Instant>,
    pub max_retries: u8,
}

impl PipelineContext {
    #[must_use]
    pub fn from_config(config: &ScrapeConfig, deadline: Option<Instant>) -> Self {
        Self {
            plan: config.extraction_plan(),
            policy: config.request_policy().cloned().map(Arc::new),
            navigation: config.navigation_options(),
            deadline,
            max_retries: config.max_retries(),
        }
    }

    #[must_use]
    pub fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// Fetch and extract one listing, never failing
///
/// Retryable failures get up to `max_retries` more attempts, each on a
/// fresh page.
pub async fn process_listing<S: RenderSession>(
    session: &S,
    ctx: &PipelineContext,
    url: &str,
) -> ProductRecord {
    if !is_valid_url(url) {
        warn!("Skipping invalid listing URL: {url}");
        return ProductRecord::failed(url, PageError::InvalidUrl(url.to_string()).to_string());
    }

    let mut attempt: u8 = 0;
    loop {
        match run_attempt(session, ctx, url).await {
            Ok(record) => return record,
            Err(e) if e.is_retryable() && attempt < ctx.max_retries && !ctx.deadline_passed() => {
                attempt += 1;
                warn!(
                    "Attempt {attempt}/{} for {url} failed, retrying: {e}",
                    u16::from(ctx.max_retries) + 1
                );
                tokio::time::sleep(Duration::from_millis(RETRY_BACKOFF_MS * u64::from(attempt)))
                    .await;
            }
            Err(e) => {
                warn!("Extraction failed for {url}: {e}");
                return ProductRecord::failed(url, e.to_string());
            }
        }
    }
}

/// One attempt on a fresh page; the page is closed before returning
async fn run_attempt<S: RenderSession>(
    session: &S,
    ctx: &PipelineContext,
    url: &str,
) -> Result<ProductRecord, PageError> {
    // Allocation is not cut short: a dropped request can still create the target
    let mut page = PageGuard::new(session.new_page().await?, url);
    if ctx.deadline_passed() {
        if let Err(e) = page.close().await {
            warn!("Failed to close page for {url}: {e}");
        }
        return Err(PageError::BatchDeadlineExceeded);
    }

    let outcome = with_batch_deadline(fetch_and_extract(&mut *page, ctx, url), ctx.deadline).await;

    if let Err(e) = page.close().await {
        warn!("Failed to close page for {url}: {e}");
    }
    outcome
}

async fn fetch_and_extract<P: RenderPage>(
    page: &mut P,
    ctx: &PipelineContext,
    url: &str,
) -> Result<ProductRecord, PageError> {
    if let Some(policy) = &ctx.policy
        && let Err(e) = page.install_request_policy(Arc::clone(policy)).await
    {
        warn!("Request policy not applied for {url}, continuing unfiltered: {e}");
    }

    fetch_page(page, url, &ctx.navigation).await?;

    let extraction = extract(&*page, url, &ctx.plan).await;
    debug!("Signals for {url}: {:?}", extraction.signals);
    Ok(extraction.record)
}
