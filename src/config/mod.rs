//! Configuration module for listing extraction
//!
//! This module provides the `ScrapeConfig` struct and its type-safe builder
//! for configuring batch extraction with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod methods;
pub mod types;

// Re-exports for public API
pub use builder::{ScrapeConfigBuilder, WithEndpoint};
pub use methods::{
    BATCH_TIMEOUT_ENV_VAR, BLOCK_RESOURCES_ENV_VAR, NAV_TIMEOUT_ENV_VAR, POOL_SIZE_ENV_VAR,
    READINESS_ENV_VAR,
};
pub use types::ScrapeConfig;
