//! Hook scanner over `.kino/hooks/`.

use async_trait::async_trait;
use kino_core::artifact::ArtifactSource;
use kino_core::error::Result;
use kino_core::hook::{HOOK_EXTENSION, Hook};
use std::path::{Path, PathBuf};
use tokio::fs;

pub struct AsyncDirHookSource {
    hooks_dir: PathBuf,
}

impl AsyncDirHookSource {
    pub fn new(hooks_dir: impl AsRef<Path>) -> Self {
        Self {
            hooks_dir: hooks_dir.as_ref().to_path_buf(),
        }
    }

    async fn hook_files(&self) -> Result<Vec<PathBuf>> {
        let mut entries = match fs::read_dir(&self.hooks_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some(HOOK_EXTENSION)
                && entry.file_type().await?.is_file()
            {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

#[async_trait]
impl ArtifactSource<Hook> for AsyncDirHookSource {
    /// Reads every `*.hook` file. Files that cannot be read or parsed are
    /// logged and left out.
    async fn scan(&self) -> Result<Vec<Hook>> {
        let mut hooks = Vec::new();

        for path in self.hook_files().await? {
            let content = match fs::read_to_string(&path).await {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!("[HookSource] Failed to read {}: {}", path.display(), e);
                    continue;
                }
            };

            match Hook::parse(&content, &path) {
                Ok(hook) => hooks.push(hook),
                Err(e) => tracing::warn!("[HookSource] Skipping hook: {}", e),
            }
        }

        tracing::debug!("[HookSource] Scanned {} hooks", hooks.len());
        Ok(hooks)
    }
}
