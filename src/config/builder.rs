//! Type-safe builder for `ScrapeConfig` using the typestate pattern
//!
//! This module provides a fluent builder interface with compile-time validation
//! ensuring that the endpoint is set before building a `ScrapeConfig`.

use anyhow::{Result, anyhow, bail};
use std::marker::PhantomData;

use super::types::ScrapeConfig;
use crate::batch_engine::request_filter::RequestPolicy;
use crate::page_extractor::probes::ExtractionSelectors;
use crate::page_extractor::schema::ItemStatus;
use crate::render_session::ReadinessCondition;
use crate::utils::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_MAX_BATCH_SIZE, DEFAULT_NAVIGATION_TIMEOUT_SECS,
    DEFAULT_NETWORK_IDLE_WINDOW_MS, DEFAULT_POOL_SIZE,
};

// Type states for the builder
pub struct WithEndpoint;

pub struct ScrapeConfigBuilder<State = ()> {
    pub(crate) endpoint: Option<String>,
    pub(crate) pool_size: usize,
    pub(crate) max_batch_size: usize,
    pub(crate) readiness: ReadinessCondition,
    pub(crate) navigation_timeout_secs: u64,
    pub(crate) network_idle_ms: u64,
    pub(crate) connect_timeout_secs: u64,
    pub(crate) batch_timeout_secs: Option<u64>,
    pub(crate) pacing_delay_ms: Option<u64>,
    pub(crate) max_retries: u8,
    pub(crate) block_resources: bool,
    pub(crate) request_policy: RequestPolicy,
    pub(crate) selectors: ExtractionSelectors,
    pub(crate) default_item_status: ItemStatus,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for ScrapeConfigBuilder<()> {
    fn default() -> Self {
        Self {
            endpoint: None,
            pool_size: DEFAULT_POOL_SIZE,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            readiness: ReadinessCondition::default(),
            navigation_timeout_secs: DEFAULT_NAVIGATION_TIMEOUT_SECS,
            network_idle_ms: DEFAULT_NETWORK_IDLE_WINDOW_MS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            batch_timeout_secs: None,
            pacing_delay_ms: None,
            max_retries: 0,
            block_resources: true,
            request_policy: RequestPolicy::default(),
            selectors: ExtractionSelectors::default(),
            default_item_status: ItemStatus::default(),
            _phantom: PhantomData,
        }
    }
}

impl ScrapeConfig {
    /// Create a builder for configuring a `ScrapeConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> ScrapeConfigBuilder<()> {
        ScrapeConfigBuilder::default()
    }
}

impl ScrapeConfigBuilder<()> {
    pub fn endpoint(self, endpoint: impl Into<String>) -> ScrapeConfigBuilder<WithEndpoint> {
        ScrapeConfigBuilder {
            endpoint: Some(endpoint.into().trim().to_string()),
            pool_size: self.pool_size,
            max_batch_size: self.max_batch_size,
            readiness: self.readiness,
            navigation_timeout_secs: self.navigation_timeout_secs,
            network_idle_ms: self.network_idle_ms,
            connect_timeout_secs: self.connect_timeout_secs,
            batch_timeout_secs: self.batch_timeout_secs,
            pacing_delay_ms: self.pacing_delay_ms,
            max_retries: self.max_retries,
            block_resources: self.block_resources,
            request_policy: self.request_policy,
            selectors: self.selectors,
            default_item_status: self.default_item_status,
            _phantom: PhantomData,
        }
    }
}

// Build method only available when the endpoint is set
impl ScrapeConfigBuilder<WithEndpoint> {
    /// Validate and build the config
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is blank, the pool size or max batch
    /// size is zero, or a timeout is zero.
    pub fn build(self) -> Result<ScrapeConfig> {
        let endpoint = self
            .endpoint
            .filter(|e| !e.is_empty())
            .ok_or_else(|| anyhow!("endpoint is required"))?;

        if self.pool_size == 0 {
            bail!("pool_size must be at least 1");
        }
        if self.max_batch_size == 0 {
            bail!("max_batch_size must be at least 1");
        }
        if self.navigation_timeout_secs == 0 {
            bail!("navigation_timeout_secs must be greater than 0");
        }
        if self.connect_timeout_secs == 0 {
            bail!("connect_timeout_secs must be greater than 0");
        }
        if self.batch_timeout_secs == Some(0) {
            bail!("batch_timeout_secs must be greater than 0 when set");
        }

        Ok(ScrapeConfig {
            endpoint,
            pool_size: self.pool_size,
            max_batch_size: self.max_batch_size,
            readiness: self.readiness,
            navigation_timeout_secs: self.navigation_timeout_secs,
            network_idle_ms: self.network_idle_ms,
            connect_timeout_secs: self.connect_timeout_secs,
            batch_timeout_secs: self.batch_timeout_secs,
            pacing_delay_ms: self.pacing_delay_ms.filter(|ms| *ms > 0),
            max_retries: self.max_retries,
            block_resources: self.block_resources,
            request_policy: self.request_policy,
            selectors: self.selectors,
            default_item_status: self.default_item_status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_observed_handlers() {
        let config = ScrapeConfig::builder()
            .endpoint("wss://chrome.example?token=abc")
            .build()
            .unwrap();

        assert_eq!(config.pool_size, 2);
        assert_eq!(config.navigation_timeout_secs, 20);
        assert_eq!(config.readiness, ReadinessCondition::NetworkIdle);
        assert_eq!(config.default_item_status, ItemStatus::Unknown);
        assert_eq!(config.max_retries, 0);
        assert!(config.batch_timeout_secs.is_none());
        assert!(config.block_resources);
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let err = ScrapeConfig::builder()
            .endpoint("ws://localhost:3000")
            .pool_size(0)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("pool_size"));

        assert!(
            ScrapeConfig::builder()
                .endpoint("ws://localhost:3000")
                .navigation_timeout_secs(0)
                .build()
                .is_err()
        );
        assert!(
            ScrapeConfig::builder()
                .endpoint("ws://localhost:3000")
                .max_batch_size(0)
                .build()
                .is_err()
        );
    }

    #[test]
    fn blank_endpoint_is_rejected() {
        assert!(ScrapeConfig::builder().endpoint("   ").build().is_err());
    }
}
