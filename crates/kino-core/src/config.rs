//! Settings and secret configuration models.
//!
//! `KinoSettings` is scoped to one project root and lives in
//! `.kino/settings/kino.toml`. API keys are kept apart in [`SecretConfig`],
//! which is read through [`crate::secret::SecretService`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_PROVIDER: &str = "deepseek";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_MCP_RETRY_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive usable in a `tracing_subscriber::EnvFilter`.
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralSettings {
    pub auto_refresh: bool,
    pub log_level: LogLevel,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            auto_refresh: true,
            log_level: LogLevel::Info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LlmSettings {
    pub default_provider: String,
    /// Completion request bound in milliseconds
    pub request_timeout: u64,
}

impl LlmSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout)
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            default_provider: DEFAULT_PROVIDER.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HookSettings {
    pub enabled: bool,
    pub auto_execute_on_save: bool,
}

impl Default for HookSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            auto_execute_on_save: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct McpSettings {
    pub auto_connect: bool,
    pub retry_attempts: u32,
}

impl Default for McpSettings {
    fn default() -> Self {
        Self {
            auto_connect: true,
            retry_attempts: DEFAULT_MCP_RETRY_ATTEMPTS,
        }
    }
}

/// Project-scoped extension settings. Every field is optional on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KinoSettings {
    pub general: GeneralSettings,
    pub llm: LlmSettings,
    pub hooks: HookSettings,
    pub mcp: McpSettings,
}

/// Credentials for one completion provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSecret {
    pub api_key: String,
}

/// Contents of the secret store, keyed by provider name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderSecret>,
}

impl SecretConfig {
    /// The stored key for `provider`, ignoring blank entries.
    pub fn api_key(&self, provider: &str) -> Option<&str> {
        self.providers
            .get(provider)
            .map(|p| p.api_key.trim())
            .filter(|key| !key.is_empty())
    }

    pub fn set_api_key(&mut self, provider: &str, api_key: impl Into<String>) {
        self.providers.insert(
            provider.to_string(),
            ProviderSecret {
                api_key: api_key.into(),
            },
        );
    }
}
