use crate::mcp::Transport;
use clap::Parser;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Implicit config file picked up from the working directory.
const CWD_CONFIG_FILE: &str = "config.yaml";

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "List the tools advertised by MCP servers", long_about = None)]
pub struct Cli {
    /// Config file path (YAML)
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// MCP server endpoint to discover
    #[arg(short, long, conflicts_with_all = ["server", "all"])]
    pub endpoint: Option<String>,

    /// Name of a server from the servers file
    #[arg(short, long, conflicts_with = "all")]
    pub server: Option<String>,

    /// Discover every server in the servers file
    #[arg(long)]
    pub all: bool,

    /// Transport hint for --endpoint (advisory; both encodings are always accepted)
    #[arg(short, long, default_value_t = Transport::Http, conflicts_with_all = ["server", "all"])]
    pub transport: Transport,

    /// Extra request header, NAME=VALUE (repeatable; applies to every server with --all)
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Request timeout in milliseconds
    #[arg(long, env = "MCP_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Path of the `mcp.json` servers file
    #[arg(long, env = "MCP_SERVERS_FILE")]
    pub servers_file: Option<String>,

    /// Emit JSON logs
    #[arg(long)]
    pub log_json: Option<bool>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl Cli {
    pub fn header_map(&self) -> HashMap<String, String> {
        self.headers.iter().cloned().collect()
    }
}

/// Parse `NAME=VALUE`.
fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("invalid header '{raw}': expected NAME=VALUE"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("invalid header '{raw}': empty name"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub discovery: DiscoveryConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DiscoveryConfig {
    pub timeout_ms: u64,
    pub servers_file: String,
}

impl DiscoveryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub filter: String,
    pub json: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Self::from_cli(&cli)
    }

    /// Priority: CLI flag > CLI env var > `MCPD_*` env > config file > defaults.
    pub fn from_cli(cli: &Cli) -> Result<Self, config::ConfigError> {
        let mut builder = Config::builder()
            .set_default("discovery.timeout_ms", 10_000)?
            .set_default("discovery.servers_file", "mcp.json")?
            .set_default("logging.filter", "info")?
            .set_default("logging.json", false)?;

        if let Some(path) = &cli.config {
            builder = builder.add_source(File::new(path, FileFormat::Yaml));
        } else if Path::new(CWD_CONFIG_FILE).exists() {
            builder = builder.add_source(File::new(CWD_CONFIG_FILE, FileFormat::Yaml));
        }

        // E.g. MCPD_DISCOVERY__TIMEOUT_MS=2500
        builder = builder.add_source(
            Environment::with_prefix("MCPD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(timeout) = cli.timeout_ms {
            builder = builder.set_override("discovery.timeout_ms", timeout)?;
        }
        if let Some(file) = &cli.servers_file {
            builder = builder.set_override("discovery.servers_file", file.as_str())?;
        }
        if let Some(json) = cli.log_json {
            builder = builder.set_override("logging.json", json)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        if cfg.discovery.timeout_ms == 0 {
            return Err(config::ConfigError::Message(
                "discovery.timeout_ms must be greater than 0".into(),
            ));
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_parsing() {
        assert_eq!(
            parse_header("Authorization=Bearer a=b").unwrap(),
            ("Authorization".to_string(), "Bearer a=b".to_string())
        );
        assert!(parse_header("no-separator").is_err());
        assert!(parse_header("=value").is_err());
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "mcp-discovery",
            "--endpoint",
            "http://localhost:8931/mcp",
            "--transport",
            "sse",
            "-H",
            "X-Api-Key=k1",
            "-H",
            "X-Team=core",
        ])
        .unwrap();
        assert_eq!(cli.transport, Transport::Sse);
        assert_eq!(cli.header_map().len(), 2);
        assert_eq!(cli.header_map()["X-Api-Key"], "k1");
    }

    #[test]
    fn test_endpoint_conflicts_with_all() {
        let res = Cli::try_parse_from([
            "mcp-discovery",
            "--endpoint",
            "http://localhost/mcp",
            "--all",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn test_transport_only_with_endpoint() {
        assert!(Cli::try_parse_from(["mcp-discovery", "--all", "-t", "sse"]).is_err());
        assert!(Cli::try_parse_from(["mcp-discovery", "-s", "tavily", "-t", "sse"]).is_err());
        // The default value alone does not conflict.
        let cli = Cli::try_parse_from(["mcp-discovery", "--all", "-H", "X-Team=core"]).unwrap();
        assert!(cli.all);
        assert_eq!(cli.header_map()["X-Team"], "core");
    }

    #[test]
    fn test_timeout_conversion() {
        let cfg = DiscoveryConfig {
            timeout_ms: 1500,
            servers_file: "mcp.json".into(),
        };
        assert_eq!(cfg.timeout(), Duration::from_millis(1500));
    }
}
