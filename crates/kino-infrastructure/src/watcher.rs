//! Change notifications for the `.kino` subdirectories.
//!
//! One recursive watch per category. Raw filesystem events are debounced, so a
//! burst of writes inside one subdirectory produces a single category signal
//! on the [`ArtifactEventBus`].

use crate::paths::KinoPaths;
use crate::project_files::ProjectFiles;
use kino_core::error::{KinoError, Result};
use kino_core::event::{ArtifactCategory, ArtifactEventBus};
use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer};
use std::sync::Mutex;
use std::time::Duration;

/// Debounce interval for one category.
pub const DEBOUNCE_MS: u64 = 200;

pub struct DirectoryWatcher {
    paths: KinoPaths,
    files: ProjectFiles,
    bus: ArtifactEventBus,
    // Dropping a Debouncer stops its watcher
    debouncers: Mutex<Vec<Debouncer<RecommendedWatcher>>>,
}

impl DirectoryWatcher {
    /// Ensures the `.kino` layout exists, then starts watching it.
    ///
    /// # Errors
    ///
    /// `KinoError::DirectoryInit` if the layout cannot be created, or
    /// `KinoError::Internal` if a watch cannot be registered.
    pub fn start(paths: KinoPaths, bus: ArtifactEventBus) -> Result<Self> {
        paths.ensure_layout()?;

        let mut debouncers = Vec::with_capacity(ArtifactCategory::ALL.len());
        for category in ArtifactCategory::ALL {
            debouncers.push(Self::watch_category(&paths, category, bus.clone())?);
        }
        tracing::info!("[Watcher] Watching {}", paths.kino_dir().display());

        Ok(Self {
            files: ProjectFiles::new(paths.kino_dir()),
            paths,
            bus,
            debouncers: Mutex::new(debouncers),
        })
    }

    fn watch_category(
        paths: &KinoPaths,
        category: ArtifactCategory,
        bus: ArtifactEventBus,
    ) -> Result<Debouncer<RecommendedWatcher>> {
        let dir = paths.subdirectory(category);

        let mut debouncer = new_debouncer(
            Duration::from_millis(DEBOUNCE_MS),
            move |events: DebounceEventResult| match events {
                Ok(events) if !events.is_empty() => {
                    tracing::debug!("[Watcher] {} ({} paths)", category, events.len());
                    bus.publish(category);
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("[Watcher] {} watch error: {}", category, e),
            },
        )
        .map_err(|e| KinoError::internal(format!("Failed to create watcher: {e}")))?;

        debouncer
            .watcher()
            .watch(&dir, RecursiveMode::Recursive)
            .map_err(|e| KinoError::internal(format!("Failed to watch {}: {e}", dir.display())))?;

        Ok(debouncer)
    }

    pub fn paths(&self) -> &KinoPaths {
        &self.paths
    }

    /// File helpers relative to the watched `.kino` folder.
    pub fn files(&self) -> &ProjectFiles {
        &self.files
    }

    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<ArtifactCategory> {
        self.bus.subscribe()
    }

    pub fn is_disposed(&self) -> bool {
        self.lock_debouncers().is_empty()
    }

    /// Stops every watch. Calling it again does nothing.
    pub fn dispose(&self) {
        let mut debouncers = self.lock_debouncers();
        if !debouncers.is_empty() {
            debouncers.clear();
            tracing::info!("[Watcher] Disposed");
        }
    }

    fn lock_debouncers(&self) -> std::sync::MutexGuard<'_, Vec<Debouncer<RecommendedWatcher>>> {
        self.debouncers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for DirectoryWatcher {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::time::timeout;

    fn start(temp_dir: &TempDir) -> (DirectoryWatcher, ArtifactEventBus) {
        let bus = ArtifactEventBus::new();
        let watcher = DirectoryWatcher::start(KinoPaths::for_project(temp_dir.path()), bus.clone()).unwrap();
        (watcher, bus)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_creates_layout_on_start() {
        let temp_dir = TempDir::new().unwrap();
        let (watcher, _bus) = start(&temp_dir);

        assert!(watcher.paths().mcp_config_file().exists());
        for category in ArtifactCategory::ALL {
            assert!(watcher.files().subdirectory_path(category).is_dir());
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_write_in_hooks_emits_hooks_changed() {
        let temp_dir = TempDir::new().unwrap();
        let (watcher, bus) = start(&temp_dir);
        let mut rx = bus.subscribe();

        watcher
            .files()
            .write_file("hooks/lint.kino.hook", "{}")
            .await
            .unwrap();

        let category = timeout(Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
        assert_eq!(category, ArtifactCategory::Hooks);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_burst_is_coalesced() {
        let temp_dir = TempDir::new().unwrap();
        let (watcher, bus) = start(&temp_dir);
        let mut rx = bus.subscribe();

        for i in 0..5 {
            watcher
                .files()
                .write_file(format!("steering/doc{i}.md"), "x")
                .await
                .unwrap();
        }

        let first = timeout(Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
        assert_eq!(first, ArtifactCategory::Steering);

        // Anything still queued afterwards must be a later debounce window, not five signals
        tokio::time::sleep(Duration::from_millis(DEBOUNCE_MS * 3)).await;
        let mut extra = 0;
        while rx.try_recv().is_ok() {
            extra += 1;
        }
        assert!(extra < 4, "expected coalesced signals, got {} extra", extra);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_dispose_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let (watcher, _bus) = start(&temp_dir);

        assert!(!watcher.is_disposed());
        watcher.dispose();
        watcher.dispose();
        assert!(watcher.is_disposed());
    }

    #[test]
    fn test_start_fails_when_layout_cannot_be_created() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(".kino"), "file").unwrap();

        let result = DirectoryWatcher::start(KinoPaths::for_project(temp_dir.path()), ArtifactEventBus::new());
        assert!(matches!(result, Err(KinoError::DirectoryInit { .. })));
    }
}
