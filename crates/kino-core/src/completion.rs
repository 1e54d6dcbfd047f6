//! Completion client seam.
//!
//! The chat store depends on this trait only; `kino-interaction` provides the
//! HTTP implementation and tests substitute stubs.

use crate::error::Result;
use crate::session::{ChatMode, MessageContext};
use async_trait::async_trait;
use std::time::Duration;

/// Everything needed for one completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// The user's message
    pub text: String,
    pub mode: ChatMode,
    /// Artifact names listed in the system prompt
    pub context: MessageContext,
    pub api_key: String,
    pub model: String,
    /// Upper bound for the whole request
    pub timeout: Duration,
}

/// Sends one user message to a completion endpoint and returns the reply text.
///
/// Implementations perform exactly one attempt; retries are the caller's call.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}

/// Supplies the context refs attached to each outgoing message.
#[async_trait]
pub trait PromptContextProvider: Send + Sync {
    async fn prompt_context(&self) -> MessageContext;
}

/// A provider that never offers any context.
pub struct NoPromptContext;

#[async_trait]
impl PromptContextProvider for NoPromptContext {
    async fn prompt_context(&self) -> MessageContext {
        MessageContext::default()
    }
}
