//! MCP server domain model.
//!
//! Servers are declared in `.kino/settings/mcp.json`. Connection status is
//! runtime state owned by whoever manages the server processes; it is never
//! written back to the configuration document.

use crate::artifact::Named;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Connection state of an MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum McpServerStatus {
    Connected,
    #[default]
    Disconnected,
    Error,
}

impl McpServerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            McpServerStatus::Connected => "connected",
            McpServerStatus::Disconnected => "disconnected",
            McpServerStatus::Error => "error",
        }
    }

    /// Lenient parse used for status strings coming from outside.
    ///
    /// Anything that is not `connected` or `error` reads as disconnected.
    pub fn from_status_str(status: &str) -> Self {
        match status {
            "connected" => McpServerStatus::Connected,
            "error" => McpServerStatus::Error,
            _ => McpServerStatus::Disconnected,
        }
    }
}

impl fmt::Display for McpServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the `mcpServers` map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpServerConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// The `settings/mcp.json` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpConfiguration {
    #[serde(default)]
    pub mcp_servers: BTreeMap<String, McpServerConfig>,
}

impl McpConfiguration {
    /// Servers in name order, all starting out disconnected.
    pub fn servers(&self) -> Vec<McpServer> {
        self.mcp_servers
            .iter()
            .map(|(name, config)| McpServer {
                name: name.clone(),
                command: config.command.clone(),
                args: config.args.clone(),
                status: McpServerStatus::Disconnected,
                last_error: None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpServer {
    pub name: String,
    pub command: String,
    pub args: Vec<String>,
    pub status: McpServerStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl Named for McpServer {
    fn name(&self) -> &str {
        &self.name
    }
}
