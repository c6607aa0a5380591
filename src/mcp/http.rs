//! HTTP seam for discovery calls.
//!
//! [`HttpTransport`] performs one POST and returns the status plus the full
//! body as text. [`ReqwestTransport`] is the production implementation; tests
//! plug in their own.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

use super::error::{DiscoveryError, Result};
use super::types::RawResponse;

/// One outbound POST with a fully prepared header set and body.
#[async_trait]
pub trait HttpTransport: Send + Sync + std::fmt::Debug {
    async fn post(&self, url: &Url, headers: &[(String, String)], body: String)
    -> Result<RawResponse>;
}

/// [`HttpTransport`] backed by a shared `reqwest::Client`.
///
/// The call is bounded by the caller; see [`DiscoveryClient`](super::DiscoveryClient).
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom reqwest client (proxies, TLS roots, ...).
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    fn header_map(headers: &[(String, String)]) -> Result<HeaderMap> {
        let mut map = HeaderMap::with_capacity(headers.len());
        for (name, value) in headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                DiscoveryError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                }
            })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|e| DiscoveryError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            map.insert(header_name, header_value);
        }
        Ok(map)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post(
        &self,
        url: &Url,
        headers: &[(String, String)],
        body: String,
    ) -> Result<RawResponse> {
        let headers = Self::header_map(headers)?;

        let resp = self
            .http
            .post(url.clone())
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let body = resp.text().await?;

        Ok(RawResponse { status, body })
    }
}
