//! In-flight request accounting for network-idle readiness
//!
//! A page is network-idle once no request is outstanding and none has
//! started or settled for the idle window. Resource-timing entries only
//! appear after a request finishes, so the count has to come from request
//! lifecycle events instead.

use std::collections::HashSet;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct NetworkActivity {
    inflight: HashSet<String>,
    last_change: Instant,
}

impl Default for NetworkActivity {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl NetworkActivity {
    #[must_use]
    pub fn new(now: Instant) -> Self {
        Self {
            inflight: HashSet::new(),
            last_change: now,
        }
    }

    /// A request was sent; redirects reuse the same id
    pub fn request_started(&mut self, request_id: impl Into<String>, now: Instant) {
        self.inflight.insert(request_id.into());
        self.last_change = now;
    }

    /// A request finished or failed
    pub fn request_settled(&mut self, request_id: &str, now: Instant) {
        if self.inflight.remove(request_id) {
            self.last_change = now;
        }
    }

    #[must_use]
    pub fn inflight(&self) -> usize {
        self.inflight.len()
    }

    #[must_use]
    pub fn is_idle_at(&self, now: Instant, window: Duration) -> bool {
        self.inflight.is_empty() && now.saturating_duration_since(self.last_change) >= window
    }
}
