use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, collections::HashMap, fs, path::Path};

use super::error::DiscoveryError;
use super::types::{DiscoveryRequest, Transport};

/// Contents of an `mcp.json` server file.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct McpConfig {
    #[serde(rename = "mcpServers", default)]
    pub mcp_servers: BTreeMap<String, McpServerEntry>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum McpServerEntry {
    RemoteHttp {
        url: String,
        #[serde(default)]
        transport: Transport,
        #[serde(default)]
        headers: HashMap<String, String>,
    },
    /// Parsed so shared config files load, but never discoverable over HTTP.
    Stdio {
        command: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default)]
        env: HashMap<String, String>,
    },
}

impl McpServerEntry {
    /// Build the discovery request for this entry, expanding `${VAR}` in
    /// header values.
    pub fn to_request(&self, name: &str) -> Result<DiscoveryRequest, DiscoveryError> {
        match self {
            Self::RemoteHttp {
                url,
                transport,
                headers,
            } => Ok(DiscoveryRequest::new(expand_env_placeholders(url))
                .with_transport(*transport)
                .with_headers(expand_env_map(headers))),
            Self::Stdio { .. } => Err(DiscoveryError::UnsupportedServer(name.to_string())),
        }
    }
}

impl McpConfig {
    pub fn from_json(txt: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(txt)?)
    }
}

pub fn load_mcp_config(path: impl AsRef<Path>) -> anyhow::Result<McpConfig> {
    let txt = fs::read_to_string(path)?;
    McpConfig::from_json(&txt)
}

/// Expand `${VAR}` placeholders from the process environment.
/// Missing variables leave the placeholder unchanged.
pub fn expand_env_placeholders(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        match std::env::var(name) {
            Ok(v) if !name.is_empty() => out.push_str(&v),
            _ => out.push_str(&rest[start..start + 2 + end + 1]),
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}

pub fn expand_env_map(map: &HashMap<String, String>) -> HashMap<String, String> {
    map.iter()
        .map(|(k, v)| (k.clone(), expand_env_placeholders(v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const SERVERS: &str = r#"{
        "mcpServers": {
            "tavily": {
                "url": "https://mcp.tavily.com/mcp/",
                "transport": "sse",
                "headers": { "Authorization": "Bearer ${MCPD_TEST_TOKEN}" }
            },
            "local": { "url": "http://127.0.0.1:8931/mcp" },
            "time": { "command": "npx", "args": ["-y", "@mcpcentral/mcp-time"] }
        }
    }"#;

    #[test]
    fn test_parses_remote_and_stdio_entries() {
        let cfg = McpConfig::from_json(SERVERS).unwrap();
        assert_eq!(cfg.mcp_servers.len(), 3);
        assert!(matches!(
            cfg.mcp_servers["local"],
            McpServerEntry::RemoteHttp { transport: Transport::Http, .. }
        ));
        assert!(matches!(cfg.mcp_servers["time"], McpServerEntry::Stdio { .. }));
    }

    #[test]
    #[serial]
    fn test_to_request_expands_headers() {
        unsafe {
            std::env::set_var("MCPD_TEST_TOKEN", "abc123");
        }
        let cfg = McpConfig::from_json(SERVERS).unwrap();
        let req = cfg.mcp_servers["tavily"].to_request("tavily").unwrap();
        assert_eq!(req.endpoint, "https://mcp.tavily.com/mcp/");
        assert_eq!(req.transport, Transport::Sse);
        assert_eq!(req.headers["Authorization"], "Bearer abc123");
        unsafe {
            std::env::remove_var("MCPD_TEST_TOKEN");
        }
    }

    #[test]
    fn test_stdio_entry_is_not_discoverable() {
        let cfg = McpConfig::from_json(SERVERS).unwrap();
        let err = cfg.mcp_servers["time"].to_request("time").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Server 'time' uses stdio transport; only HTTP endpoints can be discovered."
        );
    }

    #[test]
    #[serial]
    fn test_unknown_placeholders_are_kept() {
        assert_eq!(
            expand_env_placeholders("x-${MCPD_SURELY_UNSET_VAR}-${"),
            "x-${MCPD_SURELY_UNSET_VAR}-${"
        );
        assert_eq!(expand_env_placeholders("plain"), "plain");
        assert_eq!(expand_env_placeholders("${}"), "${}");
    }
}
