//! RAII guard for render pages
//!
//! Every page opened for a listing must be closed exactly once, whether the
//! pipeline succeeded, failed, or was cancelled. The happy path awaits
//! [`PageGuard::close`]; if a guard is dropped with its page still open, the
//! close is spawned onto the runtime instead.

use log::{debug, warn};
use std::ops::{Deref, DerefMut};

use crate::render_session::{PageError, RenderPage};

/// Owns one page for the lifetime of a pipeline attempt
pub struct PageGuard<P: RenderPage> {
    page: Option<P>,
    label: String,
}

impl<P: RenderPage> PageGuard<P> {
    pub fn new(page: P, label: impl Into<String>) -> Self {
        Self {
            page: Some(page),
            label: label.into(),
        }
    }

    /// Close the page now
    ///
    /// # Errors
    ///
    /// Propagates the backend's close failure; the page counts as released
    /// either way.
    pub async fn close(mut self) -> Result<(), PageError> {
        match self.page.take() {
            Some(page) => {
                debug!("Closing page for {}", self.label);
                page.close().await
            }
            None => Ok(()),
        }
    }
}

impl<P: RenderPage> Deref for PageGuard<P> {
    type Target = P;

    fn deref(&self) -> &P {
        self.page.as_ref().expect("page should be present until close")
    }
}

impl<P: RenderPage> DerefMut for PageGuard<P> {
    fn deref_mut(&mut self) -> &mut P {
        self.page.as_mut().expect("page should be present until close")
    }
}

impl<P: RenderPage> Drop for PageGuard<P> {
    fn drop(&mut self) {
        let Some(page) = self.page.take() else {
            return;
        };

        let label = std::mem::take(&mut self.label);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                debug!("PageGuard dropped with open page for {label} - spawning close");
                handle.spawn(async move {
                    if let Err(e) = page.close().await {
                        warn!("Deferred page close failed for {label}: {e}");
                    }
                });
            }
            Err(_) => warn!("No runtime to close page for {label}; dropping it"),
        }
    }
}
