//! Sub-resource request policy
//!
//! A page only has to render far enough for its structured data and primary
//! markup to exist. Images, fonts, styles and tracker traffic add latency and
//! remote-session cost without adding extractable signal, so the default
//! policy refuses them. Policies are plain data; the render backend applies
//! one per page and tears it down with the page.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::utils::{BLOCKED_TRACKER_HOSTS, host_matches_domain, host_of};

/// Sub-resource type as reported by the browser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Document,
    Stylesheet,
    Image,
    Media,
    Font,
    Script,
    TextTrack,
    Xhr,
    Fetch,
    Prefetch,
    EventSource,
    WebSocket,
    Manifest,
    Ping,
    CspViolationReport,
    Preflight,
    Other,
}

/// Outcome for one paused request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestDecision {
    Allow,
    Block,
}

/// Deny-list over resource kinds and destination hosts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestPolicy {
    blocked_kinds: HashSet<ResourceKind>,
    blocked_hosts: Vec<String>,
}

impl Default for RequestPolicy {
    fn default() -> Self {
        Self {
            blocked_kinds: [
                ResourceKind::Image,
                ResourceKind::Media,
                ResourceKind::Font,
                ResourceKind::Stylesheet,
                ResourceKind::TextTrack,
                ResourceKind::Manifest,
                ResourceKind::Ping,
                ResourceKind::CspViolationReport,
                ResourceKind::Prefetch,
            ]
            .into_iter()
            .collect(),
            blocked_hosts: BLOCKED_TRACKER_HOSTS.iter().map(|h| (*h).to_string()).collect(),
        }
    }
}

impl RequestPolicy {
    /// Policy that lets everything through
    #[must_use]
    pub fn allow_all() -> Self {
        Self {
            blocked_kinds: HashSet::new(),
            blocked_hosts: Vec::new(),
        }
    }

    #[must_use]
    pub fn block_kind(mut self, kind: ResourceKind) -> Self {
        self.blocked_kinds.insert(kind);
        self
    }

    #[must_use]
    pub fn allow_kind(mut self, kind: ResourceKind) -> Self {
        self.blocked_kinds.remove(&kind);
        self
    }

    /// Block `domain` and all of its subdomains
    #[must_use]
    pub fn block_host(mut self, domain: impl Into<String>) -> Self {
        let domain = domain.into().trim().trim_start_matches('.').to_ascii_lowercase();
        if !domain.is_empty() && !self.blocked_hosts.contains(&domain) {
            self.blocked_hosts.push(domain);
        }
        self
    }

    #[must_use]
    pub fn blocked_kinds(&self) -> &HashSet<ResourceKind> {
        &self.blocked_kinds
    }

    #[must_use]
    pub fn blocked_hosts(&self) -> &[String] {
        &self.blocked_hosts
    }

    /// Classify one request
    ///
    /// The top-level document is always allowed unless its host is
    /// deny-listed; a blocked listing page would only produce an empty record.
    #[must_use]
    pub fn decide(&self, kind: ResourceKind, url: &str) -> RequestDecision {
        if let Some(host) = host_of(url)
            && self
                .blocked_hosts
                .iter()
                .any(|domain| host_matches_domain(&host, domain))
        {
            return RequestDecision::Block;
        }

        if kind != ResourceKind::Document && self.blocked_kinds.contains(&kind) {
            return RequestDecision::Block;
        }

        RequestDecision::Allow
    }
}
