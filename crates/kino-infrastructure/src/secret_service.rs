//! Secret service implementation.
//!
//! Reads and writes API keys in secret.json through [`SecretStorage`] and
//! caches the parsed document.

use crate::storage::SecretStorage;
use async_trait::async_trait;
use kino_core::config::SecretConfig;
use kino_core::error::Result;
use kino_core::secret::SecretService;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// File-backed [`SecretService`].
///
/// A missing secret file reads as an empty configuration; it is created on the
/// first `set_api_key`.
#[derive(Clone)]
pub struct SecretServiceImpl {
    storage: Arc<SecretStorage>,
    /// Cached secret config loaded from storage.
    secrets: Arc<RwLock<Option<SecretConfig>>>,
}

impl SecretServiceImpl {
    /// Creates a service over the default secret file location.
    pub fn new() -> Result<Self> {
        Ok(Self::from_storage(SecretStorage::new()?))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self::from_storage(SecretStorage::with_path(path))
    }

    fn from_storage(storage: SecretStorage) -> Self {
        Self {
            storage: Arc::new(storage),
            secrets: Arc::new(RwLock::new(None)),
        }
    }

    /// Drops the cached document so the next read goes to disk.
    pub async fn invalidate_cache(&self) {
        *self.secrets.write().await = None;
    }

    fn read_from_storage(&self) -> Result<SecretConfig> {
        match self.storage.load() {
            Ok(config) => Ok(config),
            Err(e) if e.is_not_found() => {
                tracing::debug!(
                    "[SecretService] No secret file at {}, using empty config",
                    self.storage.path().display()
                );
                Ok(SecretConfig::default())
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig> {
        {
            let cached = self.secrets.read().await;
            if let Some(ref config) = *cached {
                return Ok(config.clone());
            }
        }

        let loaded = self.read_from_storage()?;
        *self.secrets.write().await = Some(loaded.clone());
        Ok(loaded)
    }

    async fn set_api_key(&self, provider: &str, api_key: &str) -> Result<()> {
        let mut cached = self.secrets.write().await;
        let mut config = match cached.take() {
            Some(config) => config,
            None => self.read_from_storage()?,
        };

        config.set_api_key(provider, api_key.trim());
        let result = self.storage.save(&config);
        *cached = Some(config);
        result?;

        tracing::info!("[SecretService] Stored API key for provider '{}'", provider);
        Ok(())
    }
}
