//! Render endpoint resolution
//!
//! Hosted browser farms hand out either a DevTools WebSocket URL directly
//! (`wss://chrome.browserless.io?token=...`) or an HTTP base whose
//! `/json/version` document names the WebSocket to use.

use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use super::errors::SessionError;
use crate::utils::CHROME_USER_AGENT;

#[derive(Debug, Deserialize)]
struct VersionInfo {
    #[serde(rename = "webSocketDebuggerUrl")]
    web_socket_debugger_url: Option<String>,
}

/// Turn a configured endpoint into a DevTools WebSocket URL
///
/// # Errors
///
/// `InvalidEndpoint` for unparseable or non-browser schemes;
/// `EndpointDiscovery` when the `/json/version` lookup fails.
pub async fn resolve_ws_endpoint(
    client: &reqwest::Client,
    endpoint: &str,
) -> Result<String, SessionError> {
    let endpoint = endpoint.trim();
    let parsed =
        Url::parse(endpoint).map_err(|_| SessionError::InvalidEndpoint(endpoint.to_string()))?;

    match parsed.scheme() {
        "ws" | "wss" => Ok(endpoint.to_string()),
        "http" | "https" => discover_ws_endpoint(client, parsed).await,
        _ => Err(SessionError::InvalidEndpoint(endpoint.to_string())),
    }
}

async fn discover_ws_endpoint(
    client: &reqwest::Client,
    base: Url,
) -> Result<String, SessionError> {
    let mut version_url = base.clone();
    version_url.set_path(&format!("{}/json/version", base.path().trim_end_matches('/')));

    info!("Resolving DevTools endpoint via {}", version_url.path());

    let info: VersionInfo = client
        .get(version_url)
        .header(reqwest::header::USER_AGENT, CHROME_USER_AGENT)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|e| SessionError::EndpointDiscovery(e.to_string()))?
        .json()
        .await
        .map_err(|e| SessionError::EndpointDiscovery(format!("invalid version document: {e}")))?;

    let ws_url = info
        .web_socket_debugger_url
        .filter(|url| !url.is_empty())
        .ok_or_else(|| {
            SessionError::EndpointDiscovery("No webSocketDebuggerUrl in response".to_string())
        })?;

    // Hosted farms authenticate with a query token that the version document omits
    match (base.query(), Url::parse(&ws_url)) {
        (Some(query), Ok(mut ws)) if ws.query().is_none() => {
            ws.set_query(Some(query));
            debug!("Carried endpoint query over to WebSocket URL");
            Ok(ws.to_string())
        }
        _ => Ok(ws_url),
    }
}
