//! Project settings service.
//!
//! Loads `.kino/settings/kino.toml` into a [`KinoSettings`] value scoped to one
//! project. Every key is optional; a missing file yields the defaults.

use crate::paths::KinoPaths;
use crate::storage::AtomicTomlFile;
use kino_core::config::KinoSettings;
use kino_core::error::Result;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct SettingsService {
    file: Arc<AtomicTomlFile<KinoSettings>>,
    current: Arc<RwLock<KinoSettings>>,
}

impl SettingsService {
    /// Loads the settings of the project described by `paths`.
    pub fn load(paths: &KinoPaths) -> Result<Self> {
        Self::load_from(&paths.settings_file())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let file = AtomicTomlFile::new(path.to_path_buf());
        let settings = file.load()?.unwrap_or_default();
        tracing::debug!("[Settings] Loaded {}", path.display());

        Ok(Self {
            file: Arc::new(file),
            current: Arc::new(RwLock::new(settings)),
        })
    }

    /// A snapshot of the current settings.
    pub async fn settings(&self) -> KinoSettings {
        self.current.read().await.clone()
    }

    /// Re-reads the file. On a parse failure the previous settings stay active
    /// and the error is returned.
    pub async fn reload(&self) -> Result<KinoSettings> {
        let settings = self.file.load()?.unwrap_or_default();
        *self.current.write().await = settings.clone();
        tracing::info!("[Settings] Reloaded {}", self.file.path().display());
        Ok(settings)
    }

    /// Applies `f` to the current settings and writes them back.
    pub async fn update<F>(&self, f: F) -> Result<KinoSettings>
    where
        F: FnOnce(&mut KinoSettings),
    {
        let mut current = self.current.write().await;
        let mut updated = current.clone();
        f(&mut updated);
        self.file.save(&updated)?;
        *current = updated.clone();
        Ok(updated)
    }
}
