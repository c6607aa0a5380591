//! Failure taxonomy for tool discovery.
//!
//! Every variant renders the exact message surfaced to callers through
//! [`DiscoveryResult::Failure`](super::DiscoveryResult::Failure).

use thiserror::Error;

use super::types::DiscoveryResult;

/// Number of body characters quoted in an HTTP failure message.
pub const BODY_EXCERPT_CHARS: usize = 100;

/// Message used when a transport error carries no text of its own.
pub const UNREACHABLE_MESSAGE: &str = "Failed to reach MCP server.";

/// Discovery error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    /// Endpoint is not an absolute http(s) URL.
    #[error("Invalid MCP server URL '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// A caller header could not be put on the wire.
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    /// Network unreachable, connection reset, body read failure.
    #[error("{}", non_empty_or_unreachable(.0))]
    Transport(String),

    /// The bounded request timeout elapsed.
    #[error("Request to MCP server timed out after {0}ms")]
    Timeout(u64),

    /// Server answered with a non-success status.
    #[error("Server responded with {status}: {excerpt}")]
    Http { status: u16, excerpt: String },

    /// Neither an SSE data frame nor the whole body parsed as JSON.
    #[error("Failed to parse response as JSON or SSE.")]
    Decode,

    /// Well-formed JSON-RPC error object.
    #[error("{0}")]
    Protocol(String),

    /// Success envelope without `result.tools`.
    #[error("Invalid MCP response: 'result.tools' not found")]
    Schema,

    /// The caller cancelled the in-flight call.
    #[error("cancelled")]
    Cancelled,

    /// Configured server cannot be reached over HTTP.
    #[error("Server '{0}' uses stdio transport; only HTTP endpoints can be discovered.")]
    UnsupportedServer(String),
}

impl DiscoveryError {
    /// Builds an HTTP failure, quoting at most [`BODY_EXCERPT_CHARS`] of the body.
    pub fn http(status: u16, body: &str) -> Self {
        Self::Http {
            status,
            excerpt: body.chars().take(BODY_EXCERPT_CHARS).collect(),
        }
    }

    /// Builds a protocol failure from the server's `error.message`, if any.
    pub fn protocol(message: Option<&str>) -> Self {
        let message = message
            .filter(|m| !m.is_empty())
            .unwrap_or("MCP Server Error");
        Self::Protocol(message.to_string())
    }

    /// Short category name, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidEndpoint { .. } => "invalid_endpoint",
            Self::InvalidHeader { .. } => "invalid_header",
            Self::Transport(_) => "transport",
            Self::Timeout(_) => "timeout",
            Self::Http { .. } => "http",
            Self::Decode => "decode",
            Self::Protocol(_) => "protocol",
            Self::Schema => "schema",
            Self::Cancelled => "cancelled",
            Self::UnsupportedServer(_) => "unsupported_server",
        }
    }
}

fn non_empty_or_unreachable(text: &str) -> &str {
    if text.trim().is_empty() {
        UNREACHABLE_MESSAGE
    } else {
        text
    }
}

impl From<reqwest::Error> for DiscoveryError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<DiscoveryError> for DiscoveryResult {
    fn from(err: DiscoveryError) -> Self {
        Self::Failure {
            message: err.to_string(),
        }
    }
}

/// Result type alias for discovery internals.
pub type Result<T> = std::result::Result<T, DiscoveryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_excerpt_is_truncated_to_100_chars() {
        let body = "é".repeat(150);
        let err = DiscoveryError::http(502, &body);
        let message = err.to_string();
        assert!(message.starts_with("Server responded with 502: "));
        let excerpt = message.trim_start_matches("Server responded with 502: ");
        assert_eq!(excerpt.chars().count(), 100);
    }

    #[test]
    fn test_protocol_message_fallback() {
        assert_eq!(DiscoveryError::protocol(Some("nope")).to_string(), "nope");
        assert_eq!(
            DiscoveryError::protocol(None).to_string(),
            "MCP Server Error"
        );
        assert_eq!(
            DiscoveryError::protocol(Some("")).to_string(),
            "MCP Server Error"
        );
    }

    #[test]
    fn test_empty_transport_text_uses_unreachable_message() {
        assert_eq!(
            DiscoveryError::Transport(String::new()).to_string(),
            UNREACHABLE_MESSAGE
        );
        assert_eq!(
            DiscoveryError::Transport("connection refused".into()).to_string(),
            "connection refused"
        );
    }

    #[test]
    fn test_conversion_into_failure() {
        let result: DiscoveryResult = DiscoveryError::Schema.into();
        assert_eq!(
            result.error(),
            Some("Invalid MCP response: 'result.tools' not found")
        );
        assert_eq!(DiscoveryError::Cancelled.kind(), "cancelled");
    }
}
