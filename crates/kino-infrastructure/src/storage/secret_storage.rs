//! Secret configuration file storage.
//!
//! Provides loading and saving of `~/.config/kino/secret.json`.

use super::atomic_toml::write_atomic;
use crate::paths::KinoPaths;
use kino_core::config::SecretConfig;
use kino_core::error::{KinoError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Storage for the secret configuration file (secret.json).
///
/// Responsibilities:
/// - Load secret.json and parse it into `SecretConfig`
/// - Write it back with user-only permissions
///
/// Does NOT:
/// - Validate API keys or credentials
/// - Handle encryption (plaintext JSON storage)
pub struct SecretStorage {
    path: PathBuf,
}

impl SecretStorage {
    /// Creates a SecretStorage at the default path (~/.config/kino/secret.json).
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: KinoPaths::secret_file()?,
        })
    }

    /// Creates a new SecretStorage with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the secret configuration from the JSON file.
    ///
    /// # Returns
    ///
    /// - `Ok(SecretConfig)`: Successfully loaded and parsed
    /// - `Err(KinoError::NotFound)`: File doesn't exist
    /// - `Err(KinoError::FileParse)`: Invalid JSON format
    pub fn load(&self) -> Result<SecretConfig> {
        if !self.path.exists() {
            return Err(KinoError::not_found(
                "SecretFile",
                self.path.display().to_string(),
            ));
        }

        let content = fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|e| KinoError::file_parse(&self.path, e))
    }

    /// Writes the configuration, replacing the file atomically.
    ///
    /// On Unix the file ends up with mode 600.
    pub fn save(&self, config: &SecretConfig) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, json.as_bytes())?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
