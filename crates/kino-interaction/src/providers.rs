//! Completion provider selection.
//!
//! `llm.defaultProvider` in the project settings names the provider; this
//! module maps that name onto a client.

use crate::deepseek_api_agent::{self, DeepSeekApiAgent};
use kino_core::completion::CompletionClient;
use kino_core::error::{KinoError, Result};
use std::sync::Arc;

pub const SUPPORTED_PROVIDERS: &[&str] = &[deepseek_api_agent::PROVIDER_NAME];

/// Creates the completion client for `provider` (case-insensitive).
///
/// # Errors
///
/// `KinoError::Config` when the provider is not supported.
pub fn create_completion_client(provider: &str) -> Result<Arc<dyn CompletionClient>> {
    match provider.trim().to_ascii_lowercase().as_str() {
        deepseek_api_agent::PROVIDER_NAME => Ok(Arc::new(DeepSeekApiAgent::new())),
        other => Err(KinoError::config(format!(
            "Unsupported LLM provider '{other}'. Supported providers: {}",
            SUPPORTED_PROVIDERS.join(", ")
        ))),
    }
}
