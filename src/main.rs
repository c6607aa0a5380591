//! `mcp-discovery` command-line entry point.
//!
//! Prints the discovery result of one endpoint, one named server, or every
//! server of the servers file as JSON on stdout.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, anyhow};
use clap::Parser;
use dotenvy::dotenv;
use tracing::info;

use mcp_discovery::config::{AppConfig, Cli};
use mcp_discovery::mcp::{
    DiscoveryClient, DiscoveryRequest, DiscoveryResult, ReqwestTransport,
    discover_all_with_headers, load_mcp_config,
};
use mcp_discovery::telemetry;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env (if present)
    let _ = dotenv();

    let cli = Cli::parse();
    let config = match AppConfig::from_cli(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::from(2);
        }
    };

    telemetry::init(&config.logging);

    match run(&cli, &config).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

/// Returns whether every discovery succeeded.
async fn run(cli: &Cli, config: &AppConfig) -> anyhow::Result<bool> {
    // The client-level timeout bounds the whole call; this only stops a dead
    // host from holding the connect phase.
    let http = reqwest::Client::builder()
        .connect_timeout(config.discovery.timeout())
        .build()
        .context("failed to build HTTP client")?;
    let client = DiscoveryClient::with_transport(
        Arc::new(ReqwestTransport::with_client(http)),
        config.discovery.timeout(),
    );

    info!(
        name: "discovery.config.loaded",
        timeout_ms = config.discovery.timeout_ms,
        servers_file = %config.discovery.servers_file,
        "Discovery configuration loaded"
    );

    if cli.all {
        let servers = load_servers(config)?;
        let results = discover_all_with_headers(&client, &servers, &cli.header_map()).await;
        let all_ok = results.values().all(DiscoveryResult::is_success);
        print_json(&results, cli.pretty)?;
        return Ok(all_ok);
    }

    let request = if let Some(endpoint) = &cli.endpoint {
        DiscoveryRequest::new(endpoint.as_str()).with_transport(cli.transport)
    } else if let Some(name) = &cli.server {
        let servers = load_servers(config)?;
        let entry = servers
            .mcp_servers
            .get(name)
            .ok_or_else(|| anyhow!("server '{name}' not found in {}", config.discovery.servers_file))?;
        match entry.to_request(name) {
            Ok(req) => req,
            Err(err) => {
                let result: DiscoveryResult = err.into();
                print_json(&result, cli.pretty)?;
                return Ok(false);
            }
        }
    } else {
        return Err(anyhow!("one of --endpoint, --server or --all is required"));
    };

    // CLI headers win over the servers file.
    let request = request.with_headers(cli.header_map());

    let result = client.discover(&request).await;
    print_json(&result, cli.pretty)?;
    Ok(result.is_success())
}

fn load_servers(config: &AppConfig) -> anyhow::Result<mcp_discovery::mcp::McpConfig> {
    let path = &config.discovery.servers_file;
    load_mcp_config(path).with_context(|| format!("failed to load MCP servers from '{path}'"))
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}
