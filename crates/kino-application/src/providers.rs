//! The four sidebar views and their collection-specific queries.

use crate::nodes;
use crate::tree_provider::ArtifactTreeProvider;
use kino_core::error::Result;
use kino_core::event::ArtifactCategory;
use kino_core::hook::{Hook, HookEventType};
use kino_core::mcp::{McpConfiguration, McpServer, McpServerStatus};
use kino_core::spec::Spec;
use kino_core::steering::{SteeringFile, combine_steering_contents};
use kino_core::tree::TreeNode;
use kino_infrastructure::{
    AsyncDirHookSource, AsyncDirSpecSource, AsyncDirSteeringSource, JsonMcpConfigSource, KinoPaths,
};
use std::sync::Arc;

pub type SpecsProvider = ArtifactTreeProvider<Spec>;
pub type HooksProvider = ArtifactTreeProvider<Hook>;
pub type SteeringProvider = ArtifactTreeProvider<SteeringFile>;

pub fn specs_provider(paths: &KinoPaths) -> SpecsProvider {
    let source = AsyncDirSpecSource::new(paths.subdirectory(ArtifactCategory::Specs));
    ArtifactTreeProvider::new("Specs", Arc::new(source), nodes::spec_node)
}

pub fn hooks_provider(paths: &KinoPaths) -> HooksProvider {
    let source = AsyncDirHookSource::new(paths.subdirectory(ArtifactCategory::Hooks));
    ArtifactTreeProvider::new("Hooks", Arc::new(source), nodes::hook_node)
}

pub fn steering_provider(paths: &KinoPaths) -> SteeringProvider {
    let source = AsyncDirSteeringSource::new(paths.subdirectory(ArtifactCategory::Steering));
    ArtifactTreeProvider::new("Steering", Arc::new(source), nodes::steering_node)
}

impl ArtifactTreeProvider<Hook> {
    pub async fn enabled_hooks(&self) -> Vec<Hook> {
        self.items().await.into_iter().filter(|h| h.enabled).collect()
    }

    /// Enabled hooks triggered by `event`.
    pub async fn hooks_for_event(&self, event: HookEventType) -> Vec<Hook> {
        self.items()
            .await
            .into_iter()
            .filter(|h| h.enabled && h.event_type == event)
            .collect()
    }
}

impl ArtifactTreeProvider<SteeringFile> {
    /// Contents of the named steering file; `None` if it is not in the
    /// collection or cannot be read.
    pub async fn content(&self, name: &str) -> Option<String> {
        let file = self.find(name).await?;
        match tokio::fs::read_to_string(&file.path).await {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::warn!("[Steering] Failed to read {}: {}", file.path.display(), e);
                None
            }
        }
    }

    /// The named files joined into one document; unknown names are skipped.
    pub async fn combined_content(&self, names: &[&str]) -> String {
        let mut sections = Vec::new();
        for name in names {
            if let Some(content) = self.content(name).await {
                sections.push((*name, content));
            }
        }
        combine_steering_contents(sections.iter().map(|(name, content)| (*name, content.as_str())))
    }
}

/// The MCP servers view. Status is runtime state and is lost on rescan.
pub struct McpProvider {
    tree: ArtifactTreeProvider<McpServer>,
    source: Arc<JsonMcpConfigSource>,
}

impl McpProvider {
    pub fn new(paths: &KinoPaths) -> Self {
        let source = Arc::new(JsonMcpConfigSource::new(paths.mcp_config_file()));
        Self {
            tree: ArtifactTreeProvider::new("MCP", source.clone(), nodes::mcp_server_node),
            source,
        }
    }

    pub fn tree(&self) -> &ArtifactTreeProvider<McpServer> {
        &self.tree
    }

    pub async fn refresh(&self) -> Result<()> {
        self.tree.refresh().await
    }

    pub async fn roots(&self) -> Vec<TreeNode> {
        self.tree.roots().await
    }

    pub async fn servers(&self) -> Vec<McpServer> {
        self.tree.items().await
    }

    pub async fn server(&self, name: &str) -> Option<McpServer> {
        self.tree.find(name).await
    }

    /// Sets a server's status and replaces (or clears) its last error.
    ///
    /// Returns `false` when no server has that name.
    pub async fn update_server_status(
        &self,
        name: &str,
        status: McpServerStatus,
        error: Option<String>,
    ) -> bool {
        if self.tree.find(name).await.is_none() {
            return false;
        }

        self.tree
            .update_items(|servers| {
                if let Some(server) = servers.iter_mut().find(|s| s.name == name) {
                    server.status = status;
                    server.last_error = error.filter(|e| !e.is_empty());
                }
            })
            .await;
        tracing::debug!("[MCP] {} is now {}", name, status);
        true
    }

    /// The parsed `mcp.json`, or `None` when it is missing or invalid.
    pub async fn configuration(&self) -> Option<McpConfiguration> {
        self.source.load_configuration().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn layout() -> (TempDir, KinoPaths) {
        let temp_dir = TempDir::new().unwrap();
        let paths = KinoPaths::for_project(temp_dir.path());
        paths.ensure_layout().unwrap();
        (temp_dir, paths)
    }

    #[tokio::test]
    async fn test_hook_queries() {
        let (_temp_dir, paths) = layout();
        let hooks_dir = paths.subdirectory(ArtifactCategory::Hooks);
        std::fs::write(hooks_dir.join("a.kino.hook"), r#"{"eventType":"fileSaved"}"#).unwrap();
        std::fs::write(hooks_dir.join("b.kino.hook"), r#"{"eventType":"fileSaved","enabled":false}"#).unwrap();
        std::fs::write(hooks_dir.join("c.kino.hook"), r#"{}"#).unwrap();

        let provider = hooks_provider(&paths);
        provider.refresh().await.unwrap();

        assert_eq!(provider.enabled_hooks().await.len(), 2);
        let saved: Vec<_> = provider
            .hooks_for_event(HookEventType::FileSaved)
            .await
            .into_iter()
            .map(|h| h.name)
            .collect();
        assert_eq!(saved, vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn test_steering_combined_content() {
        let (_temp_dir, paths) = layout();
        let dir = paths.subdirectory(ArtifactCategory::Steering);
        std::fs::write(dir.join("style.md"), "Use tabs").unwrap();
        std::fs::write(dir.join("tone.md"), "Be brief").unwrap();

        let provider = steering_provider(&paths);
        provider.refresh().await.unwrap();

        assert_eq!(provider.content("style").await.as_deref(), Some("Use tabs"));
        assert_eq!(provider.content("missing").await, None);
        assert_eq!(
            provider.combined_content(&["tone", "missing", "style"]).await,
            "# tone\n\nBe brief\n\n---\n\n# style\n\nUse tabs"
        );
    }

    #[tokio::test]
    async fn test_mcp_status_update_redraws_and_clears_error() {
        let (_temp_dir, paths) = layout();
        std::fs::write(
            paths.mcp_config_file(),
            r#"{"mcpServers":{"fs":{"command":"npx","args":["server-fs"]}}}"#,
        )
        .unwrap();

        let provider = McpProvider::new(&paths);
        provider.refresh().await.unwrap();
        let mut redraw = provider.tree().subscribe_redraw();

        assert!(provider.update_server_status("fs", McpServerStatus::Error, Some("boom".into())).await);
        redraw.try_recv().unwrap();
        let server = provider.server("fs").await.unwrap();
        assert_eq!(server.status, McpServerStatus::Error);
        assert_eq!(server.last_error.as_deref(), Some("boom"));
        assert!(provider.roots().await[0].tooltip.as_deref().unwrap().ends_with("\nError: boom"));

        assert!(provider.update_server_status("fs", McpServerStatus::Connected, None).await);
        assert_eq!(provider.server("fs").await.unwrap().last_error, None);

        assert!(!provider.update_server_status("nope", McpServerStatus::Connected, None).await);
    }

    #[tokio::test]
    async fn test_mcp_configuration() {
        let (_temp_dir, paths) = layout();
        let provider = McpProvider::new(&paths);
        assert_eq!(provider.configuration().await, Some(McpConfiguration::default()));

        std::fs::write(paths.mcp_config_file(), "nope").unwrap();
        assert_eq!(provider.configuration().await, None);
    }
}
