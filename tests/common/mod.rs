//! Test utilities and an in-memory render backend for the listingscrape test suite
//!
//! `FakeBackend` answers every probe from static HTML through `scraper`, so
//! the whole batch engine runs without a browser. Each listing URL is given
//! a scripted [`Behavior`], and [`Counters`] record every session and page
//! lifecycle event for assertions.

use kodegen_tools_listingscrape::batch_engine::request_filter::RequestPolicy;
use kodegen_tools_listingscrape::{
    NavigationOptions, PageError, RenderBackend, RenderPage, RenderSession, ScrapeConfig,
    SessionError,
};
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TEST_ENDPOINT: &str = "ws://127.0.0.1:9222/devtools/browser/test";

/// What navigating to a listing URL does
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Load immediately
    Html(String),
    /// Load after a delay
    Delayed { html: String, delay: Duration },
    /// Never become ready
    Hang,
    /// Fail navigation with this reason
    NavError(String),
    /// Fail navigation for the first `failures` attempts, then load
    FailTimes { failures: usize, html: String },
    /// Load, then panic inside the structured-data probe
    PanicOnExtract(String),
}

/// Lifecycle counters shared by every session and page of one backend
#[derive(Debug, Default)]
pub struct Counters {
    pub connects: AtomicUsize,
    pub session_closes: AtomicUsize,
    pub pages_opened: AtomicUsize,
    pub pages_closed: AtomicUsize,
    pub active_pages: AtomicUsize,
    pub max_active_pages: AtomicUsize,
    pub policies_installed: AtomicUsize,
    pub navigations: AtomicUsize,
}

#[allow(dead_code)]
impl Counters {
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn session_closes(&self) -> usize {
        self.session_closes.load(Ordering::SeqCst)
    }

    pub fn pages_opened(&self) -> usize {
        self.pages_opened.load(Ordering::SeqCst)
    }

    pub fn pages_closed(&self) -> usize {
        self.pages_closed.load(Ordering::SeqCst)
    }

    pub fn max_active_pages(&self) -> usize {
        self.max_active_pages.load(Ordering::SeqCst)
    }

    pub fn policies_installed(&self) -> usize {
        self.policies_installed.load(Ordering::SeqCst)
    }

    pub fn navigations(&self) -> usize {
        self.navigations.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Default)]
struct FakeState {
    listings: Mutex<HashMap<String, Behavior>>,
    attempts: Mutex<HashMap<String, usize>>,
    connect_error: Mutex<Option<String>>,
    page_error: Mutex<Option<String>>,
    page_delay: Mutex<Option<Duration>>,
    counters: Counters,
}

/// In-memory [`RenderBackend`]
#[derive(Debug, Clone, Default)]
pub struct FakeBackend {
    state: Arc<FakeState>,
}

#[allow(dead_code)]
impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing(self, url: &str, behavior: Behavior) -> Self {
        self.state
            .listings
            .lock()
            .unwrap()
            .insert(url.to_string(), behavior);
        self
    }

    pub fn with_html(self, url: &str, html: impl Into<String>) -> Self {
        self.with_listing(url, Behavior::Html(html.into()))
    }

    /// Every `connect` fails with `reason`
    pub fn failing_connect(self, reason: &str) -> Self {
        *self.state.connect_error.lock().unwrap() = Some(reason.to_string());
        self
    }

    /// Every `new_page` fails with `reason`
    pub fn failing_pages(self, reason: &str) -> Self {
        *self.state.page_error.lock().unwrap() = Some(reason.to_string());
        self
    }

    /// Every `new_page` takes `delay` before the page exists
    pub fn slow_pages(self, delay: Duration) -> Self {
        *self.state.page_delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn counters(&self) -> &Counters {
        &self.state.counters
    }
}

impl RenderBackend for FakeBackend {
    type Session = FakeSession;

    async fn connect(&self, _endpoint: &str) -> Result<FakeSession, SessionError> {
        self.state.counters.connects.fetch_add(1, Ordering::SeqCst);
        let connect_error = self.state.connect_error.lock().unwrap().clone();
        if let Some(reason) = connect_error {
            return Err(SessionError::Connect(reason));
        }
        Ok(FakeSession {
            state: Arc::clone(&self.state),
        })
    }
}

pub struct FakeSession {
    state: Arc<FakeState>,
}

impl RenderSession for FakeSession {
    type Page = FakePage;

    async fn new_page(&self) -> Result<FakePage, PageError> {
        let page_error = self.state.page_error.lock().unwrap().clone();
        if let Some(reason) = page_error {
            return Err(PageError::Allocation(reason));
        }

        let page_delay = *self.state.page_delay.lock().unwrap();
        if let Some(delay) = page_delay {
            tokio::time::sleep(delay).await;
        }

        let counters = &self.state.counters;
        counters.pages_opened.fetch_add(1, Ordering::SeqCst);
        let active = counters.active_pages.fetch_add(1, Ordering::SeqCst) + 1;
        counters.max_active_pages.fetch_max(active, Ordering::SeqCst);

        Ok(FakePage {
            state: Arc::clone(&self.state),
            html: String::new(),
            panic_on_extract: false,
        })
    }

    async fn close(self) -> Result<(), SessionError> {
        self.state.counters.session_closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct FakePage {
    state: Arc<FakeState>,
    html: String,
    panic_on_extract: bool,
}

impl RenderPage for FakePage {
    async fn install_request_policy(&mut self, _policy: Arc<RequestPolicy>) -> Result<(), PageError> {
        self.state
            .counters
            .policies_installed
            .fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn navigate(&mut self, url: &str, _options: &NavigationOptions) -> Result<(), PageError> {
        self.state.counters.navigations.fetch_add(1, Ordering::SeqCst);
        let behavior = self.state.listings.lock().unwrap().get(url).cloned();

        match behavior {
            Some(Behavior::Html(html)) => {
                self.html = html;
                Ok(())
            }
            Some(Behavior::Delayed { html, delay }) => {
                tokio::time::sleep(delay).await;
                self.html = html;
                Ok(())
            }
            Some(Behavior::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            }
            Some(Behavior::NavError(reason)) => Err(PageError::Navigation(reason)),
            Some(Behavior::FailTimes { failures, html }) => {
                let attempt = {
                    let mut attempts = self.state.attempts.lock().unwrap();
                    let count = attempts.entry(url.to_string()).or_insert(0);
                    *count += 1;
                    *count
                };
                if attempt <= failures {
                    Err(PageError::Navigation("net::ERR_CONNECTION_RESET".to_string()))
                } else {
                    self.html = html;
                    Ok(())
                }
            }
            Some(Behavior::PanicOnExtract(html)) => {
                self.html = html;
                self.panic_on_extract = true;
                Ok(())
            }
            None => Err(PageError::Navigation("net::ERR_NAME_NOT_RESOLVED".to_string())),
        }
    }

    async fn structured_data_blocks(&self) -> Result<Vec<String>, PageError> {
        if self.panic_on_extract {
            panic!("structured data probe crashed");
        }
        select_texts(&self.html, r#"script[type="application/ld+json"]"#)
    }

    async fn text_content(&self, selector: &str) -> Result<Option<String>, PageError> {
        Ok(select_texts(&self.html, selector)?
            .into_iter()
            .next()
            .filter(|text| !text.is_empty()))
    }

    async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>, PageError> {
        let document = Html::parse_document(&self.html);
        let selector = parse_selector(selector)?;
        Ok(document
            .select(&selector)
            .next()
            .and_then(|element| element.value().attr(name))
            .filter(|value| !value.is_empty())
            .map(str::to_string))
    }

    async fn close(self) -> Result<(), PageError> {
        let counters = &self.state.counters;
        counters.pages_closed.fetch_add(1, Ordering::SeqCst);
        counters.active_pages.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

fn parse_selector(selector: &str) -> Result<Selector, PageError> {
    Selector::parse(selector).map_err(|e| PageError::Probe(format!("{selector}: {e:?}")))
}

fn select_texts(html: &str, selector: &str) -> Result<Vec<String>, PageError> {
    let document = Html::parse_document(html);
    let selector = parse_selector(selector)?;
    Ok(document
        .select(&selector)
        .map(|element| element.text().collect::<String>())
        .collect())
}

/// Build a listing page with optional JSON-LD, extra head markup, and body
#[allow(dead_code)]
pub fn listing_html(json_ld: &[&str], head: &str, body: &str) -> String {
    let scripts: String = json_ld
        .iter()
        .map(|block| format!(r#"<script type="application/ld+json">{block}</script>"#))
        .collect();
    format!(
        r#"<!DOCTYPE html>
<html lang="ja">
<head>
    <meta charset="UTF-8">
    <title>listing</title>
    {scripts}
    {head}
</head>
<body>
    {body}
</body>
</html>"#
    )
}

/// A schema.org `Product` block with one offer
#[allow(dead_code)]
pub fn product_json_ld(name: &str, price: &str, availability: &str) -> String {
    serde_json::json!({
        "@context": "https://schema.org",
        "@type": "Product",
        "name": name,
        "image": ["https://static.mercdn.net/item/detail/orig/photos/m1_1.jpg"],
        "description": format!("{name} in good condition"),
        "offers": {
            "@type": "Offer",
            "price": price,
            "priceCurrency": "JPY",
            "availability": availability,
            "seller": { "@type": "Person", "name": "camera_shop", "@id": "seller-42" }
        }
    })
    .to_string()
}

/// Minimal listing page whose title comes from structured data
#[allow(dead_code)]
pub fn titled_listing(title: &str) -> String {
    listing_html(
        &[&product_json_ld(title, "1000", "https://schema.org/InStock")],
        "",
        "",
    )
}

/// Config pointed at the fake endpoint with a short navigation timeout
#[allow(dead_code)]
pub fn test_config() -> ScrapeConfig {
    ScrapeConfig::builder()
        .endpoint(TEST_ENDPOINT)
        .navigation_timeout_secs(1)
        .build()
        .expect("test config should build")
}

#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
