//! Shared configuration constants for listingscrape
//!
//! This module contains default values and selector tables used
//! throughout the codebase to ensure consistency and avoid magic numbers.

/// Default worker pool size: 2 pipelines in flight
///
/// Kept low on purpose. Marketplace listing pages sit behind bot detection
/// and bursts of parallel renders from one session get throttled or blocked
/// long before the remote browser runs out of capacity.
pub const DEFAULT_POOL_SIZE: usize = 2;

/// Default navigation timeout: 20 seconds
///
/// Observed listing templates settle between 10 and 25 seconds under
/// network-idle readiness.
pub const DEFAULT_NAVIGATION_TIMEOUT_SECS: u64 = 20;

/// Quiet window used by the network-idle readiness condition
pub const DEFAULT_NETWORK_IDLE_WINDOW_MS: u64 = 500;

/// Poll interval while waiting for a readiness condition
pub const READINESS_POLL_INTERVAL_MS: u64 = 100;

/// Default timeout for acquiring the remote session
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Base delay between retry attempts for one listing
pub const RETRY_BACKOFF_MS: u64 = 250;

/// Maximum number of URLs accepted in one batch request
pub const DEFAULT_MAX_BATCH_SIZE: usize = 50;

/// Environment variable holding the remote browser endpoint
pub const ENDPOINT_ENV_VAR: &str = "BROWSERLESS_URL";

// =============================================================================
// Extraction tables
// =============================================================================

/// Meta tags conventionally holding the numeric price amount
pub const PRICE_META_SELECTORS: &[&str] = &[
    r#"meta[name="product:price:amount"]"#,
    r#"meta[property="product:price:amount"]"#,
];

/// Meta tags holding the representative image
pub const IMAGE_META_SELECTORS: &[&str] = &[
    r#"meta[property="og:image"]"#,
    r#"meta[name="og:image"]"#,
];

/// Meta tags holding a description
pub const DESCRIPTION_META_SELECTORS: &[&str] = &[
    r#"meta[property="og:description"]"#,
    r#"meta[name="description"]"#,
];

/// DOM selectors for the listing title
pub const TITLE_SELECTORS: &[&str] = &["h1"];

/// DOM selectors for price-bearing elements, most specific first
pub const PRICE_SELECTORS: &[&str] = &[
    r#"[data-testid="price"]"#,
    "span[class*=price], div[class*=price]",
];

/// Asset hosts whose `<img>` elements carry the listing photos
pub const IMAGE_HOST_PREFIXES: &[&str] = &["https://static.mercdn.net/"];

/// Advertising and analytics hosts blocked by the default request policy
pub const BLOCKED_TRACKER_HOSTS: &[&str] = &[
    "doubleclick.net",
    "googlesyndication.com",
    "googleadservices.com",
    "google-analytics.com",
    "googletagmanager.com",
    "adservice.google.com",
    "amazon-adsystem.com",
    "facebook.net",
    "criteo.com",
    "criteo.net",
    "scorecardresearch.com",
    "hotjar.com",
    "clarity.ms",
    "taboola.com",
    "outbrain.com",
];

/// Chrome user agent string reported when resolving remote endpoints
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";
