pub mod batch_engine;
pub mod config;
pub mod page_extractor;
pub mod render_session;
pub mod utils;

pub use batch_engine::{BatchError, BatchRequest, BatchResult, scrape_batch, scrape_single};
pub use config::ScrapeConfig;
pub use page_extractor::schema::*;
pub use render_session::{
    ChromiumBackend, NavigationOptions, PageError, ReadinessCondition, RenderBackend, RenderPage,
    RenderSession, SessionError,
};

/// Extract a batch through the remote browser named by `config`
///
/// # Errors
///
/// See [`scrape_batch`].
pub async fn scrape(config: &ScrapeConfig, urls: Vec<String>) -> BatchResult<BatchResponse> {
    scrape_batch(&ChromiumBackend::new(), config, urls).await
}
