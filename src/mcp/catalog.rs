//! Discovery across every server of an `mcp.json` file.

use std::collections::{BTreeMap, HashMap};

use futures::future::join_all;

use super::client::DiscoveryClient;
use super::servers::McpConfig;
use super::types::DiscoveryResult;

/// Discover all configured servers concurrently, keyed by server name.
///
/// Each server gets its own independent call; one failing server never
/// affects the others.
pub async fn discover_all(
    client: &DiscoveryClient,
    cfg: &McpConfig,
) -> BTreeMap<String, DiscoveryResult> {
    discover_all_with_headers(client, cfg, &HashMap::new()).await
}

/// Like [`discover_all`], with `headers` laid over every server's own headers.
pub async fn discover_all_with_headers(
    client: &DiscoveryClient,
    cfg: &McpConfig,
    headers: &HashMap<String, String>,
) -> BTreeMap<String, DiscoveryResult> {
    let calls = cfg.mcp_servers.iter().map(move |(name, entry)| async move {
        let result = match entry.to_request(name) {
            Ok(request) => client.discover(&request.with_headers(headers.clone())).await,
            Err(err) => err.into(),
        };
        (name.clone(), result)
    });

    join_all(calls).await.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::error::Result;
    use crate::mcp::http::HttpTransport;
    use crate::mcp::types::RawResponse;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use url::Url;

    /// Answers by host: `good` lists one tool, anything else returns 503.
    #[derive(Debug, Default)]
    struct HostRouter {
        seen: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl HostRouter {
        fn header_for(&self, host: &str, name: &str) -> Option<String> {
            let seen = self.seen.lock().unwrap();
            let (_, headers) = seen.iter().find(|(h, _)| h == host)?;
            headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.clone())
        }
    }

    #[async_trait]
    impl HttpTransport for HostRouter {
        async fn post(
            &self,
            url: &Url,
            headers: &[(String, String)],
            _body: String,
        ) -> Result<RawResponse> {
            let host = url.host_str().unwrap_or_default().to_string();
            self.seen.lock().unwrap().push((host, headers.to_vec()));
            Ok(match url.host_str() {
                Some("good") => RawResponse {
                    status: 200,
                    body: r#"{"result":{"tools":[{"name":"echo"}]}}"#.into(),
                },
                _ => RawResponse {
                    status: 503,
                    body: "unavailable".into(),
                },
            })
        }
    }

    #[tokio::test]
    async fn test_discover_all_isolates_failures() {
        let cfg = McpConfig::from_json(
            r#"{"mcpServers": {
                "a": {"url": "http://good/mcp"},
                "b": {"url": "http://bad/mcp"},
                "c": {"command": "mcp-time"}
            }}"#,
        )
        .unwrap();
        let client =
            DiscoveryClient::with_transport(Arc::new(HostRouter::default()), Duration::from_secs(1));

        let results = discover_all(&client, &cfg).await;
        assert_eq!(results.len(), 3);
        assert_eq!(results["a"].tools().unwrap()[0].name, "echo");
        assert_eq!(
            results["b"].error(),
            Some("Server responded with 503: unavailable")
        );
        assert!(results["c"].error().unwrap().contains("stdio"));
    }

    #[tokio::test]
    async fn test_shared_headers_reach_every_server() {
        let cfg = McpConfig::from_json(
            r#"{"mcpServers": {
                "a": {"url": "http://good/mcp", "headers": {"authorization": "from-file"}},
                "b": {"url": "http://bad/mcp"}
            }}"#,
        )
        .unwrap();
        let router = Arc::new(HostRouter::default());
        let transport: Arc<HostRouter> = Arc::clone(&router);
        let client = DiscoveryClient::with_transport(transport, Duration::from_secs(1));
        let shared = HashMap::from([
            ("Authorization".to_string(), "from-cli".to_string()),
            ("X-Team".to_string(), "core".to_string()),
        ]);

        let results = discover_all_with_headers(&client, &cfg, &shared).await;
        assert!(results["a"].is_success());
        assert_eq!(router.header_for("good", "authorization").unwrap(), "from-cli");
        assert_eq!(router.header_for("good", "x-team").unwrap(), "core");
        assert_eq!(router.header_for("bad", "authorization").unwrap(), "from-cli");
    }

    #[tokio::test]
    async fn test_empty_config() {
        let results = discover_all(&DiscoveryClient::default(), &McpConfig::default()).await;
        assert!(results.is_empty());
    }
}
