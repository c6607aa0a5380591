//! Stateless MCP tool discovery client.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use super::decode::parse_tools_response;
use super::error::{DiscoveryError, Result};
use super::http::{HttpTransport, ReqwestTransport};
use super::types::{DiscoveryRequest, DiscoveryResult, RpcEnvelope, ToolDescriptor, Transport};

/// Default bound on one discovery call (request send plus body read).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Headers sent on every request unless the caller overrides them.
pub const DEFAULT_HEADERS: [(&str, &str); 2] = [
    ("Content-Type", "application/json"),
    ("Accept", "application/json, text/event-stream"),
];

/// Lists the tools of MCP servers, one request per call.
///
/// Holds configuration only; every call is independent, so a client can be
/// cloned freely and shared across tasks.
#[derive(Debug, Clone)]
pub struct DiscoveryClient {
    transport: Arc<dyn HttpTransport>,
    timeout: Duration,
}

impl Default for DiscoveryClient {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl DiscoveryClient {
    /// Create a client using reqwest with the given timeout.
    pub fn new(timeout: Duration) -> Self {
        Self::with_transport(Arc::new(ReqwestTransport::new()), timeout)
    }

    /// Create a client over a custom [`HttpTransport`].
    pub fn with_transport(transport: Arc<dyn HttpTransport>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Discover the tools advertised by `request.endpoint`.
    ///
    /// Never fails: every error is reported as [`DiscoveryResult::Failure`].
    pub async fn discover(&self, request: &DiscoveryRequest) -> DiscoveryResult {
        self.discover_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Like [`discover`](Self::discover), aborting the in-flight call when
    /// `cancel` fires. A cancelled call yields `Failure{"cancelled"}`.
    pub async fn discover_with_cancel(
        &self,
        request: &DiscoveryRequest,
        cancel: &CancellationToken,
    ) -> DiscoveryResult {
        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(DiscoveryError::Cancelled),
            res = self.try_discover(request) => res,
        };

        match outcome {
            Ok(tools) => {
                info!(
                    name: "mcp.discovery.completed",
                    endpoint = %request.endpoint,
                    transport = %request.transport,
                    tool_count = tools.len(),
                    "MCP tools discovered"
                );
                DiscoveryResult::Success { tools }
            }
            Err(err) => {
                warn!(
                    name: "mcp.discovery.failed",
                    endpoint = %request.endpoint,
                    kind = err.kind(),
                    error = %err,
                    "MCP tool discovery failed"
                );
                err.into()
            }
        }
    }

    /// Discovery with the error taxonomy exposed.
    pub async fn try_discover(&self, request: &DiscoveryRequest) -> Result<Vec<ToolDescriptor>> {
        let url = parse_endpoint(&request.endpoint)?;
        let headers = merge_headers(&request.headers);
        let body = serde_json::to_string(&RpcEnvelope::tools_list())
            .map_err(|e| DiscoveryError::Transport(e.to_string()))?;

        debug!(
            name: "mcp.discovery.request",
            endpoint = %url,
            transport = %request.transport,
            header_count = headers.len(),
            "Sending tools/list"
        );

        let raw = tokio::time::timeout(self.timeout, self.transport.post(&url, &headers, body))
            .await
            .map_err(|_elapsed| {
                DiscoveryError::Timeout(u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX))
            })??;

        if !raw.is_success() {
            return Err(DiscoveryError::http(raw.status, &raw.body));
        }

        parse_tools_response(&raw.body)
    }
}

/// Discover with a default client.
///
/// `transport` is advisory and does not change the request or decoding.
pub async fn discover(
    endpoint: &str,
    transport: Transport,
    headers: Option<HashMap<String, String>>,
) -> DiscoveryResult {
    let request = DiscoveryRequest::new(endpoint)
        .with_transport(transport)
        .with_headers(headers.unwrap_or_default());
    DiscoveryClient::default().discover(&request).await
}

fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let invalid = |reason: String| DiscoveryError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason,
    };
    let url = Url::parse(endpoint.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}

/// Defaults first, then caller headers in name order; names compare
/// case-insensitively.
fn merge_headers(extra: &HashMap<String, String>) -> Vec<(String, String)> {
    let mut merged: Vec<(String, String)> = DEFAULT_HEADERS
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();

    let mut extra: Vec<(&String, &String)> = extra.iter().collect();
    extra.sort_unstable_by(|a, b| a.0.cmp(b.0));
    for (name, value) in extra {
        if let Some(slot) = merged.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            *slot = (name.clone(), value.clone());
        } else {
            merged.push((name.clone(), value.clone()));
        }
    }
    merged
}
