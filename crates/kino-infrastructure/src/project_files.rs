//! File helpers relative to a project's `.kino` folder.

use kino_core::error::{KinoError, Result};
use kino_core::event::ArtifactCategory;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone)]
pub struct ProjectFiles {
    kino_dir: PathBuf,
}

impl ProjectFiles {
    pub fn new(kino_dir: impl AsRef<Path>) -> Self {
        Self {
            kino_dir: kino_dir.as_ref().to_path_buf(),
        }
    }

    pub fn subdirectory_path(&self, category: ArtifactCategory) -> PathBuf {
        self.kino_dir.join(category.dir_name())
    }

    /// Resolves a path relative to `.kino`, rejecting absolute paths and `..`.
    pub fn resolve(&self, relative_path: impl AsRef<Path>) -> Result<PathBuf> {
        let relative_path = relative_path.as_ref();
        let escapes = relative_path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(KinoError::invalid_input(format!(
                "Path must stay inside .kino: {}",
                relative_path.display()
            )));
        }
        Ok(self.kino_dir.join(relative_path))
    }

    pub async fn file_exists(&self, relative_path: impl AsRef<Path>) -> bool {
        match self.resolve(relative_path) {
            Ok(path) => fs::try_exists(path).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    pub async fn read_file(&self, relative_path: impl AsRef<Path>) -> Result<String> {
        let path = self.resolve(relative_path)?;
        fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                KinoError::not_found("File", path.display().to_string())
            } else {
                e.into()
            }
        })
    }

    /// Writes a file, creating missing parent directories.
    pub async fn write_file(&self, relative_path: impl AsRef<Path>, content: &str) -> Result<()> {
        let path = self.resolve(relative_path)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, content).await?;
        Ok(())
    }

    /// Removes a file; a missing file is not an error.
    pub async fn delete_file(&self, relative_path: impl AsRef<Path>) -> Result<()> {
        let path = self.resolve(relative_path)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Entry names of a `.kino` subdirectory, sorted. Empty if it is missing.
    pub async fn list_files(&self, subdir: impl AsRef<Path>) -> Result<Vec<String>> {
        let dir = self.resolve(subdir)?;
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        names.sort();
        Ok(names)
    }
}
