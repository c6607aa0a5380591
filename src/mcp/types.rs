//! Request and result types for MCP tool discovery.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// JSON-RPC request id. Only one call is ever in flight per invocation.
pub const RPC_REQUEST_ID: u64 = 1;

/// JSON-RPC method used to list a server's tools.
pub const TOOLS_LIST_METHOD: &str = "tools/list";

/// Transport the caller believes the server speaks.
///
/// The hint is advisory: the request always advertises both encodings and the
/// decoder always tries both, so the server's actual framing wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Plain JSON-RPC over HTTP.
    #[default]
    Http,
    /// JSON-RPC responses framed as Server-Sent Events.
    Sse,
}

impl Transport {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Sse => "sse",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "sse" => Ok(Self::Sse),
            other => Err(format!("unknown transport '{other}' (expected 'http' or 'sse')")),
        }
    }
}

/// One discovery call: where to go and what extra headers to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryRequest {
    /// Absolute URL of the MCP server endpoint.
    pub endpoint: String,
    /// Advisory transport hint.
    pub transport: Transport,
    /// Extra headers, merged over the defaults. The builders keep at most one
    /// entry per case-insensitive name.
    pub headers: HashMap<String, String>,
}

impl DiscoveryRequest {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            transport: Transport::default(),
            headers: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    /// Set a header, replacing any earlier value whose name differs only by case.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(name.into(), value.into());
        self
    }

    /// Set several headers at once; see [`with_header`](Self::with_header).
    ///
    /// Names are applied in sorted order, so case variants inside `headers`
    /// resolve the same way on every run.
    #[must_use]
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        let mut headers: Vec<(String, String)> = headers.into_iter().collect();
        headers.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        for (name, value) in headers {
            self.set_header(name, value);
        }
        self
    }

    fn set_header(&mut self, name: String, value: String) {
        self.headers.retain(|k, _| !k.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value);
    }
}

/// The JSON-RPC 2.0 envelope sent to the server.
///
/// Serializes to `{"jsonrpc":"2.0","id":1,"method":"tools/list","params":{}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcEnvelope {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'static str,
    pub params: serde_json::Map<String, serde_json::Value>,
}

impl RpcEnvelope {
    pub fn tools_list() -> Self {
        Self {
            jsonrpc: "2.0",
            id: RPC_REQUEST_ID,
            method: TOOLS_LIST_METHOD,
            params: serde_json::Map::new(),
        }
    }
}

/// Status and undecoded body text as received from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Normalized client-side view of one server-advertised tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "inputSchema", default = "empty_schema")]
    pub input_schema: serde_json::Value,
}

fn empty_schema() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Outcome of a discovery call. This is the only value handed to callers.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscoveryResult {
    Success { tools: Vec<ToolDescriptor> },
    Failure { message: String },
}

impl DiscoveryResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Tools of a successful result, `None` on failure.
    pub fn tools(&self) -> Option<&[ToolDescriptor]> {
        match self {
            Self::Success { tools } => Some(tools),
            Self::Failure { .. } => None,
        }
    }

    /// Failure message, `None` on success.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { message } => Some(message),
        }
    }
}

/// Wire shape: `{success:true, tools}` or `{success:false, error}`.
#[derive(Serialize)]
struct WireResult<'a> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolDescriptor]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl Serialize for DiscoveryResult {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireResult {
            success: self.is_success(),
            tools: self.tools(),
            error: self.error(),
        }
        .serialize(serializer)
    }
}
