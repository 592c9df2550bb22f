//! Getter methods for `ScrapeConfig`
//!
//! This module provides all the accessor methods for retrieving configuration
//! values from a `ScrapeConfig` instance.

use std::time::Duration;

use super::types::ScrapeConfig;
use crate::batch_engine::request_filter::RequestPolicy;
use crate::page_extractor::probes::{ExtractionPlan, ExtractionSelectors};
use crate::page_extractor::schema::ItemStatus;
use crate::render_session::{NavigationOptions, ReadinessCondition};

impl ScrapeConfig {
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[must_use]
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    #[must_use]
    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    #[must_use]
    pub fn readiness(&self) -> ReadinessCondition {
        self.readiness
    }

    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    #[must_use]
    pub fn network_idle_window(&self) -> Duration {
        Duration::from_millis(self.network_idle_ms)
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    #[must_use]
    pub fn batch_timeout(&self) -> Option<Duration> {
        self.batch_timeout_secs.map(Duration::from_secs)
    }

    #[must_use]
    pub fn pacing_delay(&self) -> Option<Duration> {
        self.pacing_delay_ms.map(Duration::from_millis)
    }

    #[must_use]
    pub fn max_retries(&self) -> u8 {
        self.max_retries
    }

    #[must_use]
    pub fn block_resources(&self) -> bool {
        self.block_resources
    }

    /// Policy applied to each page, if resource blocking is enabled
    #[must_use]
    pub fn request_policy(&self) -> Option<&RequestPolicy> {
        self.block_resources.then_some(&self.request_policy)
    }

    #[must_use]
    pub fn selectors(&self) -> &ExtractionSelectors {
        &self.selectors
    }

    #[must_use]
    pub fn default_item_status(&self) -> ItemStatus {
        self.default_item_status
    }

    /// Navigation settings handed to every page
    #[must_use]
    pub fn navigation_options(&self) -> NavigationOptions {
        NavigationOptions {
            readiness: self.readiness,
            timeout: self.navigation_timeout(),
            idle_window: self.network_idle_window(),
        }
    }

    #[must_use]
    pub fn extraction_plan(&self) -> ExtractionPlan {
        ExtractionPlan::from_selectors(&self.selectors, self.default_item_status)
    }
}
