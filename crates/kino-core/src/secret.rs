//! Secret management service trait.
//!
//! Defines the interface for loading and storing API keys.

use crate::config::SecretConfig;
use crate::error::Result;

/// Service for managing secret configuration.
///
/// # Security Note
///
/// Implementations should ensure that:
/// - Secret files have appropriate permissions (e.g., 600 on Unix)
/// - Secrets are never logged or exposed in error messages
#[async_trait::async_trait]
pub trait SecretService: Send + Sync {
    /// Loads the secret configuration. A missing store yields an empty config.
    async fn load_secrets(&self) -> Result<SecretConfig>;

    /// Stores the API key for `provider`, replacing any previous key.
    async fn set_api_key(&self, provider: &str, api_key: &str) -> Result<()>;

    /// The stored API key for `provider`, if any.
    async fn api_key(&self, provider: &str) -> Result<Option<String>> {
        let secrets = self.load_secrets().await?;
        Ok(secrets.api_key(provider).map(str::to_string))
    }
}
