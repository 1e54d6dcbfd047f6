//! Spec scanner over `.kino/specs/`.

use async_trait::async_trait;
use kino_core::artifact::ArtifactSource;
use kino_core::error::Result;
use kino_core::spec::{Spec, SpecDocument};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Every subdirectory of the specs folder is a spec named after the directory.
pub struct AsyncDirSpecSource {
    specs_dir: PathBuf,
}

impl AsyncDirSpecSource {
    pub fn new(specs_dir: impl AsRef<Path>) -> Self {
        Self {
            specs_dir: specs_dir.as_ref().to_path_buf(),
        }
    }

    pub fn specs_dir(&self) -> &Path {
        &self.specs_dir
    }
}

#[async_trait]
impl ArtifactSource<Spec> for AsyncDirSpecSource {
    async fn scan(&self) -> Result<Vec<Spec>> {
        let mut entries = match fs::read_dir(&self.specs_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut specs = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();
            let mut spec = Spec::new(name, entry.path());
            for document in SpecDocument::ALL {
                if fs::try_exists(spec.document_path(document)).await.unwrap_or(false) {
                    spec.documents.push(document);
                }
            }
            specs.push(spec);
        }

        specs.sort_by(|a, b| a.name.cmp(&b.name));
        tracing::debug!("[SpecSource] Scanned {} specs", specs.len());
        Ok(specs)
    }
}
