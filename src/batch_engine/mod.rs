//! Batch extraction engine
//!
//! Validates a batch, acquires one render session, fans the URLs out over a
//! bounded worker pool, and reassembles the outcomes in request order.

pub mod aggregator;
pub mod batch_types;
pub mod execution;
pub mod fetcher;
pub mod page_guard;
pub mod page_timeout;
pub mod pipeline;
pub mod request_filter;
pub mod scheduler;

pub use aggregator::ResultSlots;
pub use batch_types::{BatchError, BatchRequest, BatchResult};
pub use execution::{scrape_batch, scrape_single};
pub use fetcher::fetch_page;
pub use page_guard::PageGuard;
pub use page_timeout::{with_batch_deadline, with_page_timeout};
pub use pipeline::{PipelineContext, process_listing};
pub use request_filter::{RequestDecision, RequestPolicy, ResourceKind};
pub use scheduler::{PoolSettings, run_pool};
