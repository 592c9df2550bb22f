//! Chrome DevTools backend over a remote WebSocket endpoint
//!
//! Connects with chromiumoxide to an externally hosted browser (browserless
//! or any `--remote-debugging-port` Chrome). The CDP event handler runs in a
//! tracked task that is aborted when the session closes or drops.

use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::fetch::{
    ContinueRequestParams, EnableParams as FetchEnableParams, EventRequestPaused,
    FailRequestParams, RequestPattern,
};
use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams as NetworkEnableParams, ErrorReason, EventLoadingFailed, EventLoadingFinished,
    EventRequestWillBeSent, ResourceType,
};
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::listeners::EventStream;
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::{self, JoinHandle};
use tracing::{debug, info, trace, warn};

use super::endpoint::resolve_ws_endpoint;
use super::errors::{PageError, SessionError};
use super::js_scripts::{
    READINESS_SCRIPT, STRUCTURED_DATA_SCRIPT, attribute_script, text_content_script,
};
use super::network_idle::NetworkActivity;
use super::{NavigationOptions, ReadinessCondition, RenderBackend, RenderPage, RenderSession};
use crate::batch_engine::request_filter::{RequestDecision, RequestPolicy, ResourceKind};
use crate::utils::READINESS_POLL_INTERVAL_MS;

// =============================================================================
// Backend
// =============================================================================

/// Opens [`ChromiumSession`]s against a remote DevTools endpoint
#[derive(Debug, Clone, Default)]
pub struct ChromiumBackend {
    http: reqwest::Client,
}

impl ChromiumBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured HTTP client for `/json/version` discovery
    #[must_use]
    pub fn with_http_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl RenderBackend for ChromiumBackend {
    type Session = ChromiumSession;

    async fn connect(&self, endpoint: &str) -> Result<ChromiumSession, SessionError> {
        let ws_url = resolve_ws_endpoint(&self.http, endpoint).await?;

        info!("Connecting to remote browser");
        let (browser, mut handler) = Browser::connect(ws_url)
            .await
            .map_err(|e| SessionError::Connect(e.to_string()))?;

        let handler_task = task::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::error!("Browser handler error: {:?}", e);
                }
            }
            info!("Browser event handler task completed");
        });

        Ok(ChromiumSession {
            browser,
            handler: handler_task,
        })
    }
}

// =============================================================================
// Session
// =============================================================================

/// A connected remote browser
///
/// The handler MUST be aborted when done or it keeps polling a dead
/// socket; [`Drop`] covers sessions that are never closed explicitly.
#[derive(Debug)]
pub struct ChromiumSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl RenderSession for ChromiumSession {
    type Page = ChromiumPage;

    async fn new_page(&self) -> Result<ChromiumPage, PageError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| PageError::Allocation(e.to_string()))?;

        Ok(ChromiumPage {
            page,
            interceptor: None,
        })
    }

    async fn close(self) -> Result<(), SessionError> {
        let mut session = self;

        debug!("Closing remote browser");
        let closed = session
            .browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| SessionError::Close(e.to_string()));

        // No child process for a remote session; this only reaps local launches
        if let Err(e) = session.browser.wait().await {
            debug!("Browser wait after close failed: {e}");
        }

        session.handler.abort();
        closed
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        debug!("Dropping ChromiumSession - aborting handler task");
        self.handler.abort();
    }
}

// =============================================================================
// Page
// =============================================================================

/// One isolated page plus its optional interception task
#[derive(Debug)]
pub struct ChromiumPage {
    page: Page,
    interceptor: Option<JoinHandle<()>>,
}

#[derive(Debug, Deserialize)]
struct DocumentState {
    #[serde(rename = "readyState")]
    ready_state: String,
    href: String,
}

/// Request lifecycle streams for one navigation
///
/// Subscribed before the navigation is issued so the document request
/// itself is counted.
struct NetworkWatch {
    started: EventStream<EventRequestWillBeSent>,
    finished: EventStream<EventLoadingFinished>,
    failed: EventStream<EventLoadingFailed>,
}

impl ChromiumPage {
    /// Underlying chromiumoxide page
    #[must_use]
    pub fn inner(&self) -> &Page {
        &self.page
    }

    async fn document_state(&self) -> Result<DocumentState, PageError> {
        self.page
            .evaluate(READINESS_SCRIPT)
            .await
            .map_err(|e| PageError::Probe(e.to_string()))?
            .into_value()
            .map_err(|e| PageError::Probe(e.to_string()))
    }

    async fn evaluate_string(&self, script: String) -> Result<Option<String>, PageError> {
        let value: String = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| PageError::Probe(e.to_string()))?
            .into_value()
            .map_err(|e| PageError::Probe(e.to_string()))?;
        Ok((!value.is_empty()).then_some(value))
    }

    async fn watch_network(&self) -> Result<NetworkWatch, PageError> {
        let listen_err = |e: chromiumoxide::error::CdpError| PageError::Navigation(e.to_string());

        let started = self
            .page
            .event_listener::<EventRequestWillBeSent>()
            .await
            .map_err(listen_err)?;
        let finished = self
            .page
            .event_listener::<EventLoadingFinished>()
            .await
            .map_err(listen_err)?;
        let failed = self
            .page
            .event_listener::<EventLoadingFailed>()
            .await
            .map_err(listen_err)?;

        self.page
            .execute(NetworkEnableParams::default())
            .await
            .map_err(listen_err)?;

        Ok(NetworkWatch {
            started,
            finished,
            failed,
        })
    }

    /// Wait until `options.readiness` holds
    ///
    /// Document state is polled; network activity is tracked from request
    /// events as they arrive. Runs until ready; the caller bounds it with the
    /// navigation timeout.
    async fn wait_for_readiness(
        &self,
        options: &NavigationOptions,
        watch: NetworkWatch,
    ) -> Result<(), PageError> {
        let NetworkWatch {
            mut started,
            mut finished,
            mut failed,
        } = watch;
        let mut activity = NetworkActivity::new(Instant::now());

        let start = Instant::now();
        let mut ticker =
            tokio::time::interval(Duration::from_millis(READINESS_POLL_INTERVAL_MS));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                Some(event) = started.next() => {
                    activity.request_started(event.request_id.inner().clone(), Instant::now());
                }
                Some(event) = finished.next() => {
                    activity.request_settled(event.request_id.inner(), Instant::now());
                }
                Some(event) = failed.next() => {
                    activity.request_settled(event.request_id.inner(), Instant::now());
                }
                _ = ticker.tick() => match self.document_state().await {
                    Ok(state) if state.href != "about:blank" => {
                        let ready = match options.readiness {
                            ReadinessCondition::DomContentLoaded => state.ready_state != "loading",
                            ReadinessCondition::Load => state.ready_state == "complete",
                            ReadinessCondition::NetworkIdle => {
                                state.ready_state == "complete"
                                    && activity.is_idle_at(Instant::now(), options.idle_window)
                            }
                        };

                        if ready {
                            debug!(
                                "Page ready ({:?}) after {:.2}s",
                                options.readiness,
                                start.elapsed().as_secs_f64()
                            );
                            return Ok(());
                        }
                        trace!("{} requests in flight", activity.inflight());
                    }
                    Ok(_) => trace!("Navigation not committed yet"),
                    // Execution context is torn down mid-navigation; keep polling
                    Err(e) => trace!("Readiness probe failed: {e}"),
                },
            }
        }
    }
}

impl RenderPage for ChromiumPage {
    async fn install_request_policy(
        &mut self,
        policy: Arc<RequestPolicy>,
    ) -> Result<(), PageError> {
        // Listener first so no paused request slips past unanswered
        let mut paused = self
            .page
            .event_listener::<EventRequestPaused>()
            .await
            .map_err(|e| PageError::Interception(e.to_string()))?;

        self.page
            .execute(
                FetchEnableParams::builder()
                    .pattern(RequestPattern::builder().url_pattern("*").build())
                    .build(),
            )
            .await
            .map_err(|e| PageError::Interception(e.to_string()))?;

        let page = self.page.clone();
        let interceptor = task::spawn(async move {
            while let Some(event) = paused.next().await {
                let kind = resource_kind(&event.resource_type);
                let outcome = match policy.decide(kind, &event.request.url) {
                    RequestDecision::Block => {
                        trace!("Blocking {:?} request: {}", kind, event.request.url);
                        page.execute(FailRequestParams::new(
                            event.request_id.clone(),
                            ErrorReason::BlockedByClient,
                        ))
                        .await
                        .map(|_| ())
                    }
                    RequestDecision::Allow => page
                        .execute(ContinueRequestParams::new(event.request_id.clone()))
                        .await
                        .map(|_| ()),
                };
                if let Err(e) = outcome {
                    trace!("Failed to answer paused request: {e}");
                }
            }
        });

        if let Some(previous) = self.interceptor.replace(interceptor) {
            previous.abort();
        }
        Ok(())
    }

    async fn navigate(&mut self, url: &str, options: &NavigationOptions) -> Result<(), PageError> {
        let watch = self.watch_network().await?;

        let response = self
            .page
            .execute(NavigateParams::new(url))
            .await
            .map_err(|e| PageError::Navigation(e.to_string()))?;

        if let Some(error_text) = &response.result.error_text {
            return Err(PageError::Navigation(error_text.clone()));
        }

        self.wait_for_readiness(options, watch).await
    }

    async fn structured_data_blocks(&self) -> Result<Vec<String>, PageError> {
        self.page
            .evaluate(STRUCTURED_DATA_SCRIPT)
            .await
            .map_err(|e| PageError::Probe(e.to_string()))?
            .into_value()
            .map_err(|e| PageError::Probe(e.to_string()))
    }

    async fn text_content(&self, selector: &str) -> Result<Option<String>, PageError> {
        self.evaluate_string(text_content_script(selector)).await
    }

    async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>, PageError> {
        self.evaluate_string(attribute_script(selector, name)).await
    }

    async fn close(self) -> Result<(), PageError> {
        let Self { page, interceptor } = self;
        if let Some(task) = interceptor {
            task.abort();
        }
        page.close().await.map_err(|e| {
            warn!("Failed to close page: {e}");
            PageError::Close(e.to_string())
        })
    }
}

fn resource_kind(resource_type: &ResourceType) -> ResourceKind {
    match resource_type {
        ResourceType::Document => ResourceKind::Document,
        ResourceType::Stylesheet => ResourceKind::Stylesheet,
        ResourceType::Image => ResourceKind::Image,
        ResourceType::Media => ResourceKind::Media,
        ResourceType::Font => ResourceKind::Font,
        ResourceType::Script => ResourceKind::Script,
        ResourceType::TextTrack => ResourceKind::TextTrack,
        ResourceType::Xhr => ResourceKind::Xhr,
        ResourceType::Fetch => ResourceKind::Fetch,
        ResourceType::Prefetch => ResourceKind::Prefetch,
        ResourceType::EventSource => ResourceKind::EventSource,
        ResourceType::WebSocket => ResourceKind::WebSocket,
        ResourceType::Manifest => ResourceKind::Manifest,
        ResourceType::Ping => ResourceKind::Ping,
        ResourceType::CspViolationReport => ResourceKind::CspViolationReport,
        ResourceType::Preflight => ResourceKind::Preflight,
        _ => ResourceKind::Other,
    }
}
