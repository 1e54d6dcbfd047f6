//! Artifact names attached to each chat turn.

use crate::providers::{HooksProvider, SpecsProvider};
use async_trait::async_trait;
use kino_core::completion::PromptContextProvider;
use kino_core::session::MessageContext;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Builds the turn context from the current spec and hook collections plus
/// the files the host reports as open.
pub struct ArtifactPromptContext {
    specs: Arc<SpecsProvider>,
    hooks: Arc<HooksProvider>,
    active_files: RwLock<Vec<String>>,
}

impl ArtifactPromptContext {
    pub fn new(specs: Arc<SpecsProvider>, hooks: Arc<HooksProvider>) -> Self {
        Self {
            specs,
            hooks,
            active_files: RwLock::new(Vec::new()),
        }
    }

    pub async fn set_active_files(&self, files: Vec<String>) {
        *self.active_files.write().await = files;
    }
}

#[async_trait]
impl PromptContextProvider for ArtifactPromptContext {
    async fn prompt_context(&self) -> MessageContext {
        let specs = self.specs.items().await.into_iter().map(|s| s.name).collect();
        // Disabled hooks never run, so they are not offered to the model
        let hooks = self.hooks.enabled_hooks().await.into_iter().map(|h| h.name).collect();
        let files = self.active_files.read().await.clone();

        MessageContext { specs, hooks, files }
    }
}
