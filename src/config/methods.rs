//! Builder methods available for all states, and environment loading
//!
//! The builder setters can be called regardless of the builder's type state.
//! `ScrapeConfig::from_env` maps the deployment's environment variables onto
//! the same builder.

use anyhow::{Context, Result, anyhow};

use super::builder::ScrapeConfigBuilder;
use super::types::ScrapeConfig;
use crate::batch_engine::request_filter::RequestPolicy;
use crate::page_extractor::probes::ExtractionSelectors;
use crate::page_extractor::schema::ItemStatus;
use crate::render_session::ReadinessCondition;
use crate::utils::ENDPOINT_ENV_VAR;

pub const POOL_SIZE_ENV_VAR: &str = "LISTINGSCRAPE_POOL_SIZE";
pub const NAV_TIMEOUT_ENV_VAR: &str = "LISTINGSCRAPE_NAV_TIMEOUT_SECS";
pub const READINESS_ENV_VAR: &str = "LISTINGSCRAPE_READINESS";
pub const BATCH_TIMEOUT_ENV_VAR: &str = "LISTINGSCRAPE_BATCH_TIMEOUT_SECS";
pub const BLOCK_RESOURCES_ENV_VAR: &str = "LISTINGSCRAPE_BLOCK_RESOURCES";

impl<State> ScrapeConfigBuilder<State> {
    /// Set the worker pool size
    ///
    /// This is an anti-detection knob as much as a throughput one: raising it
    /// makes bursts from one session more visible to the target site.
    #[must_use]
    pub fn pool_size(mut self, size: usize) -> Self {
        self.pool_size = size;
        self
    }

    #[must_use]
    pub fn max_batch_size(mut self, size: usize) -> Self {
        self.max_batch_size = size;
        self
    }

    #[must_use]
    pub fn readiness(mut self, readiness: ReadinessCondition) -> Self {
        self.readiness = readiness;
        self
    }

    #[must_use]
    pub fn navigation_timeout_secs(mut self, secs: u64) -> Self {
        self.navigation_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn network_idle_ms(mut self, ms: u64) -> Self {
        self.network_idle_ms = ms;
        self
    }

    #[must_use]
    pub fn connect_timeout_secs(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    /// Bound the whole batch; `None` disables the deadline
    #[must_use]
    pub fn batch_timeout_secs(mut self, secs: Option<u64>) -> Self {
        self.batch_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn pacing_delay_ms(mut self, ms: Option<u64>) -> Self {
        self.pacing_delay_ms = ms;
        self
    }

    #[must_use]
    pub fn max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    #[must_use]
    pub fn block_resources(mut self, block: bool) -> Self {
        self.block_resources = block;
        self
    }

    /// Replace the default request policy (also enables blocking)
    #[must_use]
    pub fn request_policy(mut self, policy: RequestPolicy) -> Self {
        self.request_policy = policy;
        self.block_resources = true;
        self
    }

    #[must_use]
    pub fn selectors(mut self, selectors: ExtractionSelectors) -> Self {
        self.selectors = selectors;
        self
    }

    /// Status for listings whose availability is absent or unrecognized
    #[must_use]
    pub fn default_item_status(mut self, status: ItemStatus) -> Self {
        self.default_item_status = status;
        self
    }
}

impl ScrapeConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if `BROWSERLESS_URL` is unset or any optional
    /// variable fails to parse.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Same as [`ScrapeConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let endpoint =
            var(ENDPOINT_ENV_VAR).ok_or_else(|| anyhow!("{ENDPOINT_ENV_VAR} is not set"))?;
        let mut builder = ScrapeConfig::builder().endpoint(endpoint);

        if let Some(raw) = var(POOL_SIZE_ENV_VAR) {
            let size = raw
                .parse::<usize>()
                .with_context(|| format!("{POOL_SIZE_ENV_VAR} must be an integer, got '{raw}'"))?;
            builder = builder.pool_size(size);
        }

        if let Some(raw) = var(NAV_TIMEOUT_ENV_VAR) {
            let secs = raw
                .parse::<u64>()
                .with_context(|| format!("{NAV_TIMEOUT_ENV_VAR} must be seconds, got '{raw}'"))?;
            builder = builder.navigation_timeout_secs(secs);
        }

        if let Some(raw) = var(READINESS_ENV_VAR) {
            let readiness = raw
                .parse::<ReadinessCondition>()
                .map_err(|e| anyhow!("{READINESS_ENV_VAR}: {e}"))?;
            builder = builder.readiness(readiness);
        }

        if let Some(raw) = var(BATCH_TIMEOUT_ENV_VAR) {
            let secs = raw
                .parse::<u64>()
                .with_context(|| format!("{BATCH_TIMEOUT_ENV_VAR} must be seconds, got '{raw}'"))?;
            builder = builder.batch_timeout_secs(Some(secs));
        }

        if let Some(raw) = var(BLOCK_RESOURCES_ENV_VAR) {
            builder = builder.block_resources(parse_flag(&raw).ok_or_else(|| {
                anyhow!("{BLOCK_RESOURCES_ENV_VAR} must be true or false, got '{raw}'")
            })?);
        }

        builder.build()
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
