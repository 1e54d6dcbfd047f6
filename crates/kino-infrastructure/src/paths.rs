//! Unified path management for Kino files.
//!
//! Project artifacts live in a hidden `.kino` folder at the project root.
//! Secrets and logs are per-user and live under the platform config directory.
//!
//! # Directory Structure
//!
//! ```text
//! <project>/.kino/             # Project-local folder
//! ├── specs/<name>/            # requirements.md, design.md, tasks.md
//! ├── hooks/<name>.kino.hook   # JSON hook records
//! ├── steering/<name>.md       # Steering documents
//! ├── settings/
//! │   ├── mcp.json             # MCP server declarations
//! │   └── kino.toml            # Project settings
//! └── sessions/<id>.json       # Persisted chat sessions
//!
//! ~/.config/kino/              # Per-user directory
//! ├── secret.json              # API keys
//! └── logs/                    # Rolling log files
//! ```

use kino_core::error::{KinoError, Result};
use kino_core::event::ArtifactCategory;
use std::path::{Path, PathBuf};

pub const KINO_DIR_NAME: &str = ".kino";
pub const SESSIONS_DIR_NAME: &str = "sessions";
pub const MCP_CONFIG_FILE_NAME: &str = "mcp.json";
pub const SETTINGS_FILE_NAME: &str = "kino.toml";

const DEFAULT_MCP_CONFIG: &str = "{\n  \"mcpServers\": {}\n}";

/// Paths of one project's `.kino` folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KinoPaths {
    project_root: PathBuf,
    kino_dir: PathBuf,
}

impl KinoPaths {
    pub fn for_project(project_root: impl AsRef<Path>) -> Self {
        let project_root = project_root.as_ref().to_path_buf();
        let kino_dir = project_root.join(KINO_DIR_NAME);
        Self {
            project_root,
            kino_dir,
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn kino_dir(&self) -> &Path {
        &self.kino_dir
    }

    /// `.kino/<category>`
    pub fn subdirectory(&self, category: ArtifactCategory) -> PathBuf {
        self.kino_dir.join(category.dir_name())
    }

    pub fn sessions_dir(&self) -> PathBuf {
        self.kino_dir.join(SESSIONS_DIR_NAME)
    }

    pub fn mcp_config_file(&self) -> PathBuf {
        self.subdirectory(ArtifactCategory::Settings)
            .join(MCP_CONFIG_FILE_NAME)
    }

    pub fn settings_file(&self) -> PathBuf {
        self.subdirectory(ArtifactCategory::Settings)
            .join(SETTINGS_FILE_NAME)
    }

    /// Creates the `.kino` folder, its four watched subdirectories and a
    /// default `settings/mcp.json` when any of them is missing.
    ///
    /// # Errors
    ///
    /// Returns `KinoError::DirectoryInit` naming the path that could not be
    /// created.
    pub fn ensure_layout(&self) -> Result<()> {
        for category in ArtifactCategory::ALL {
            let dir = self.subdirectory(category);
            std::fs::create_dir_all(&dir).map_err(|e| KinoError::directory_init(&dir, &e))?;
        }

        let mcp_config = self.mcp_config_file();
        if !mcp_config.exists() {
            std::fs::write(&mcp_config, DEFAULT_MCP_CONFIG)
                .map_err(|e| KinoError::directory_init(&mcp_config, &e))?;
            tracing::info!("[Paths] Created default MCP configuration: {}", mcp_config.display());
        }

        Ok(())
    }

    // ========================================================================
    // Per-user locations
    // ========================================================================

    /// Returns the per-user Kino directory (e.g., `~/.config/kino/`).
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("kino"))
            .ok_or_else(|| KinoError::config("Cannot find home directory"))
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// The file is written with mode 600 on Unix by
    /// [`crate::storage::SecretStorage`].
    pub fn secret_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("secret.json"))
    }

    pub fn logs_dir() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_layout_creates_subdirectories_and_mcp_config() {
        let temp_dir = TempDir::new().unwrap();
        let paths = KinoPaths::for_project(temp_dir.path());

        paths.ensure_layout().unwrap();

        for category in ArtifactCategory::ALL {
            assert!(paths.subdirectory(category).is_dir(), "{category} missing");
        }
        let content = std::fs::read_to_string(paths.mcp_config_file()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value, serde_json::json!({ "mcpServers": {} }));
    }

    #[test]
    fn test_ensure_layout_keeps_existing_mcp_config() {
        let temp_dir = TempDir::new().unwrap();
        let paths = KinoPaths::for_project(temp_dir.path());
        paths.ensure_layout().unwrap();

        let custom = r#"{"mcpServers":{"fs":{"command":"npx"}}}"#;
        std::fs::write(paths.mcp_config_file(), custom).unwrap();
        paths.ensure_layout().unwrap();

        assert_eq!(std::fs::read_to_string(paths.mcp_config_file()).unwrap(), custom);
    }

    #[test]
    fn test_ensure_layout_fails_when_kino_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(KINO_DIR_NAME), "not a dir").unwrap();

        let result = KinoPaths::for_project(temp_dir.path()).ensure_layout();
        assert!(matches!(result, Err(KinoError::DirectoryInit { .. })));
    }

    #[test]
    fn test_settings_paths() {
        let paths = KinoPaths::for_project("/work/app");
        assert_eq!(paths.settings_file(), PathBuf::from("/work/app/.kino/settings/kino.toml"));
        assert_eq!(paths.sessions_dir(), PathBuf::from("/work/app/.kino/sessions"));
    }
}
