//! Core configuration types for listing extraction
//!
//! This module contains the main `ScrapeConfig` struct that defines the
//! remote session, scheduling, navigation, and extraction parameters.

use serde::{Deserialize, Serialize};

use crate::batch_engine::request_filter::RequestPolicy;
use crate::page_extractor::probes::ExtractionSelectors;
use crate::page_extractor::schema::ItemStatus;
use crate::render_session::ReadinessCondition;

/// Main configuration struct for batch listing extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Remote browser endpoint.
    ///
    /// `ws://`/`wss://` addresses are connected to directly; `http(s)://`
    /// addresses are resolved through `/json/version` first.
    pub(crate) endpoint: String,

    /// Number of pipelines allowed in flight at once
    ///
    /// Default: 2
    pub(crate) pool_size: usize,

    /// Maximum URLs accepted in one request
    ///
    /// Default: 50
    pub(crate) max_batch_size: usize,

    /// When a navigated page counts as ready to probe
    ///
    /// Default: network idle
    pub(crate) readiness: ReadinessCondition,

    /// Timeout in seconds for one navigation, including the readiness wait
    ///
    /// Default: 20 seconds
    pub(crate) navigation_timeout_secs: u64,

    /// Quiet period for network-idle readiness, in milliseconds
    pub(crate) network_idle_ms: u64,

    /// Timeout in seconds for acquiring the remote session
    ///
    /// Default: 30 seconds
    pub(crate) connect_timeout_secs: u64,

    /// Deadline for a whole batch, counted from session acquisition
    ///
    /// Listings still unfinished at the deadline come back as failed
    /// records. Default: none.
    pub(crate) batch_timeout_secs: Option<u64>,

    /// Pause inside a worker after each finished listing
    ///
    /// Default: none.
    pub(crate) pacing_delay_ms: Option<u64>,

    /// Extra attempts for listings that fail navigation or page allocation
    ///
    /// Default: 0
    pub(crate) max_retries: u8,

    /// Apply `request_policy` to every page
    pub(crate) block_resources: bool,
    pub(crate) request_policy: RequestPolicy,

    pub(crate) selectors: ExtractionSelectors,

    /// Status reported when availability is absent or unrecognized
    ///
    /// Default: unknown
    pub(crate) default_item_status: ItemStatus,
}
