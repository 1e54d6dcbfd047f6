//! MCP server declarations from `.kino/settings/mcp.json`.

use async_trait::async_trait;
use kino_core::artifact::ArtifactSource;
use kino_core::error::Result;
use kino_core::mcp::{McpConfiguration, McpServer};
use std::path::{Path, PathBuf};
use tokio::fs;

pub struct JsonMcpConfigSource {
    config_file: PathBuf,
}

impl JsonMcpConfigSource {
    pub fn new(config_file: impl AsRef<Path>) -> Self {
        Self {
            config_file: config_file.as_ref().to_path_buf(),
        }
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// The parsed configuration document.
    ///
    /// `None` when the file is missing or is not a valid configuration; the
    /// latter is logged.
    pub async fn load_configuration(&self) -> Option<McpConfiguration> {
        let content = match fs::read_to_string(&self.config_file).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(
                    "[McpConfig] Failed to read {}: {}",
                    self.config_file.display(),
                    e
                );
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(
                    "[McpConfig] Invalid configuration {}: {}",
                    self.config_file.display(),
                    e
                );
                None
            }
        }
    }
}

#[async_trait]
impl ArtifactSource<McpServer> for JsonMcpConfigSource {
    async fn scan(&self) -> Result<Vec<McpServer>> {
        Ok(self
            .load_configuration()
            .await
            .map(|config| config.servers())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_scan_reads_servers() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mcp.json");
        std::fs::write(&path, r#"{"mcpServers":{"fs":{"command":"npx","args":["server-fs"]}}}"#).unwrap();

        let servers = JsonMcpConfigSource::new(&path).scan().await.unwrap();
        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0].command, "npx");
    }

    #[tokio::test]
    async fn test_missing_or_invalid_config_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mcp.json");
        let source = JsonMcpConfigSource::new(&path);
        assert!(source.scan().await.unwrap().is_empty());
        assert!(source.load_configuration().await.is_none());

        std::fs::write(&path, "{ broken").unwrap();
        assert!(source.scan().await.unwrap().is_empty());
        assert!(source.load_configuration().await.is_none());
    }
}
