//! Transport-agnostic decoding of `tools/list` responses.
//!
//! MCP servers answer either with a bare JSON-RPC document or with an SSE
//! stream whose first usable `data:` frame carries that document. The body is
//! decoded the same way regardless of what the caller expected:
//!
//! 1. scan `data:` lines in order and keep the first one that parses as JSON;
//! 2. otherwise parse the whole body as one JSON document.
//!
//! The decoded document is then validated at the JSON-RPC level and projected
//! into [`ToolDescriptor`]s.

use serde_json::Value;

use super::error::{DiscoveryError, Result};
use super::types::ToolDescriptor;

const SSE_DATA_PREFIX: &str = "data:";

/// Decode a raw body into a JSON document using the SSE-then-plain fallback.
pub fn decode_body(body: &str) -> Result<Value> {
    decode_sse_frames(body)
        .or_else(|| serde_json::from_str(body).ok())
        .ok_or(DiscoveryError::Decode)
}

/// First `data:` frame that parses as JSON, if any.
///
/// Blank lines, comments, keep-alives and non-JSON frames are skipped.
pub fn decode_sse_frames(body: &str) -> Option<Value> {
    body.lines()
        .map(str::trim)
        .filter_map(|line| line.strip_prefix(SSE_DATA_PREFIX))
        .find_map(|data| serde_json::from_str(data.trim()).ok())
}

/// Validate a decoded JSON-RPC document and extract its tool catalog.
pub fn tools_from_document(doc: &Value) -> Result<Vec<ToolDescriptor>> {
    if let Some(err) = doc.get("error").filter(|e| !e.is_null()) {
        return Err(DiscoveryError::protocol(
            err.get("message").and_then(Value::as_str),
        ));
    }

    let tools = doc
        .get("result")
        .and_then(|r| r.get("tools"))
        .and_then(Value::as_array)
        .ok_or(DiscoveryError::Schema)?;

    Ok(tools
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let tool = project_tool(record);
            if tool.is_none() {
                tracing::warn!(
                    name: "mcp.discovery.tool_skipped",
                    index,
                    "Skipping tool record without a string 'name'"
                );
            }
            tool
        })
        .collect())
}

/// Project one upstream tool record.
///
/// `inputSchema` wins over the legacy `parameters`; `null` counts as absent.
/// Returns `None` when the record has no string `name`.
pub fn project_tool(record: &Value) -> Option<ToolDescriptor> {
    let name = record.get("name").and_then(Value::as_str)?;

    let description = record
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default();

    let input_schema = ["inputSchema", "parameters"]
        .into_iter()
        .filter_map(|key| record.get(key))
        .find(|v| !v.is_null())
        .cloned()
        .unwrap_or_else(|| Value::Object(serde_json::Map::new()));

    Some(ToolDescriptor {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
    })
}

/// Decode, validate and project a successful response body.
pub fn parse_tools_response(body: &str) -> Result<Vec<ToolDescriptor>> {
    let doc = decode_body(body)?;
    tools_from_document(&doc)
}
