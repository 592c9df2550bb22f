//! Remote rendering session abstraction
//!
//! The batch engine only needs a small capability set from a browser:
//! open an isolated page, navigate it under a readiness condition, intercept
//! its sub-resource requests, and answer content probes against the current
//! document. These traits are that seam. [`chromium`] implements them over
//! a remote Chrome DevTools endpoint; tests implement them in memory.

pub mod chromium;
pub mod endpoint;
pub mod errors;
pub mod js_scripts;
pub mod network_idle;

pub use chromium::{ChromiumBackend, ChromiumPage, ChromiumSession};
pub use errors::{PageError, SessionError};

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::batch_engine::request_filter::RequestPolicy;
use crate::utils::{DEFAULT_NAVIGATION_TIMEOUT_SECS, DEFAULT_NETWORK_IDLE_WINDOW_MS};

/// When a navigated page counts as ready to probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessCondition {
    /// Initial markup parsed (`document.readyState !== "loading"`)
    DomContentLoaded,
    /// Load event fired (`document.readyState === "complete"`)
    Load,
    /// Loaded, no request in flight, and none started or settled for the idle window
    #[default]
    NetworkIdle,
}

impl std::str::FromStr for ReadinessCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "domcontentloaded" => Ok(Self::DomContentLoaded),
            "load" => Ok(Self::Load),
            "networkidle" | "networkidle0" => Ok(Self::NetworkIdle),
            other => Err(format!("unknown readiness condition '{other}'")),
        }
    }
}

/// Per-navigation settings handed to [`RenderPage::navigate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationOptions {
    pub readiness: ReadinessCondition,
    pub timeout: Duration,
    /// Quiet period required by [`ReadinessCondition::NetworkIdle`]
    pub idle_window: Duration,
}

impl Default for NavigationOptions {
    fn default() -> Self {
        Self {
            readiness: ReadinessCondition::default(),
            timeout: Duration::from_secs(DEFAULT_NAVIGATION_TIMEOUT_SECS),
            idle_window: Duration::from_millis(DEFAULT_NETWORK_IDLE_WINDOW_MS),
        }
    }
}

/// Something that can open render sessions
pub trait RenderBackend: Send + Sync {
    type Session: RenderSession;

    /// Acquire one session. Failure here is fatal for a batch.
    fn connect(
        &self,
        endpoint: &str,
    ) -> impl Future<Output = Result<Self::Session, SessionError>> + Send;
}

/// One live remote browser, shared by a batch only for opening pages
pub trait RenderSession: Send + Sync + 'static {
    type Page: RenderPage;

    /// Open an isolated browsing context
    fn new_page(&self) -> impl Future<Output = Result<Self::Page, PageError>> + Send;

    /// Release the remote browser. Consumes the session.
    fn close(self) -> impl Future<Output = Result<(), SessionError>> + Send;
}

/// One isolated page, owned by exactly one pipeline task
pub trait RenderPage: Send + Sync + 'static {
    /// Attach a page-scoped interception policy for sub-resource requests
    fn install_request_policy(
        &mut self,
        policy: Arc<RequestPolicy>,
    ) -> impl Future<Output = Result<(), PageError>> + Send;

    /// Navigate and wait for `options.readiness`
    ///
    /// Implementations need not enforce `options.timeout` themselves; the
    /// fetcher wraps this call.
    fn navigate(
        &mut self,
        url: &str,
        options: &NavigationOptions,
    ) -> impl Future<Output = Result<(), PageError>> + Send;

    /// Raw text of every `application/ld+json` script, in document order
    fn structured_data_blocks(&self) -> impl Future<Output = Result<Vec<String>, PageError>> + Send;

    /// Text content of the first element matching `selector`
    fn text_content(
        &self,
        selector: &str,
    ) -> impl Future<Output = Result<Option<String>, PageError>> + Send;

    /// Attribute `name` of the first element matching `selector`
    fn attribute(
        &self,
        selector: &str,
        name: &str,
    ) -> impl Future<Output = Result<Option<String>, PageError>> + Send;

    /// Close the page and tear down its interception policy
    fn close(self) -> impl Future<Output = Result<(), PageError>> + Send;
}
