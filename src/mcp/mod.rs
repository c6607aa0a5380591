//! Model Context Protocol (MCP) tool discovery.
//!
//! This module lists the tools advertised by HTTP-reachable MCP servers. One
//! call issues one `tools/list` JSON-RPC request and returns a
//! [`DiscoveryResult`]: either the normalized tool catalog or a human-readable
//! failure message. Nothing is cached and no session is kept.
//!
//! Servers may answer with a plain JSON-RPC document or with an SSE stream;
//! both are decoded the same way regardless of the caller's transport hint.
//!
//! # Configuration
//!
//! Servers can be listed in `mcp.json`:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "tavily": {
//!       "url": "https://mcp.tavily.com/mcp/",
//!       "transport": "sse",
//!       "headers": { "Authorization": "Bearer ${TAVILY_API_KEY}" }
//!     }
//!   }
//! }
//! ```

pub mod catalog;
pub mod client;
pub mod decode;
pub mod error;
pub mod http;
pub mod servers;
pub mod types;

pub use catalog::{discover_all, discover_all_with_headers};
pub use client::{DEFAULT_TIMEOUT, DiscoveryClient, discover};
pub use error::DiscoveryError;
pub use http::{HttpTransport, ReqwestTransport};
pub use servers::{McpConfig, McpServerEntry, load_mcp_config};
pub use types::*;
