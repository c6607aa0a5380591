//! MCP tool discovery for the workflow builder.
//!
//! Given the URL of a Model Context Protocol server, this crate fetches the
//! server's advertised tools and normalizes them into a stable shape that the
//! canvas and workflow generator can consume.
//!
//! # Modules
//!
//! - [`mcp`]: discovery client, wire decoding, server file
//! - [`config`]: CLI and layered application configuration
//! - [`telemetry`]: tracing subscriber setup
//!
//! # Example
//!
//! ```rust,no_run
//! use mcp_discovery::mcp::{DiscoveryResult, Transport, discover};
//!
//! # async fn example() {
//! match discover("http://127.0.0.1:8931/mcp", Transport::Http, None).await {
//!     DiscoveryResult::Success { tools } => {
//!         for tool in tools {
//!             println!("{}: {}", tool.name, tool.description);
//!         }
//!     }
//!     DiscoveryResult::Failure { message } => eprintln!("{message}"),
//! }
//! # }
//! ```

pub mod config;
pub mod mcp;
pub mod telemetry;

pub use mcp::{DiscoveryClient, DiscoveryRequest, DiscoveryResult, ToolDescriptor, Transport};
