//! Steering scanner over `.kino/steering/`.

use async_trait::async_trait;
use kino_core::artifact::ArtifactSource;
use kino_core::error::Result;
use kino_core::steering::{STEERING_EXTENSION, SteeringFile};
use std::path::{Path, PathBuf};
use tokio::fs;

pub struct AsyncDirSteeringSource {
    steering_dir: PathBuf,
}

impl AsyncDirSteeringSource {
    pub fn new(steering_dir: impl AsRef<Path>) -> Self {
        Self {
            steering_dir: steering_dir.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl ArtifactSource<SteeringFile> for AsyncDirSteeringSource {
    async fn scan(&self) -> Result<Vec<SteeringFile>> {
        let mut entries = match fs::read_dir(&self.steering_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(STEERING_EXTENSION)
                || !entry.file_type().await?.is_file()
            {
                continue;
            }
            let Some(name) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
                continue;
            };
            files.push(SteeringFile { name, path });
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }
}
