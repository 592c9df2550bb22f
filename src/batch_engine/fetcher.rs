//! Page fetcher: navigate one page under a readiness condition and timeout

use log::debug;

use super::page_timeout::with_page_timeout;
use crate::render_session::{NavigationOptions, PageError, RenderPage};

/// Navigate `page` to `url` and wait until it is ready to probe
///
/// # Errors
///
/// `PageError::Timeout` when readiness is not reached within
/// `options.timeout`, or the backend's navigation error.
pub async fn fetch_page<P: RenderPage>(
    page: &mut P,
    url: &str,
    options: &NavigationOptions,
) -> Result<(), PageError> {
    debug!(
        "Navigating to {url} (readiness {:?}, timeout {:?})",
        options.readiness, options.timeout
    );
    with_page_timeout(page.navigate(url, options), options.timeout, "Page navigation").await
}
