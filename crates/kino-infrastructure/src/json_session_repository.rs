//! Directory-of-JSON-files SessionRepository implementation.
//!
//! Directory structure:
//! ```text
//! .kino/sessions/
//! ├── <session-id-1>.json
//! └── <session-id-2>.json
//! ```

use crate::dto::SessionDocument;
use crate::paths::KinoPaths;
use crate::storage::write_atomic;
use async_trait::async_trait;
use kino_core::error::{KinoError, Result};
use kino_core::session::{ChatSession, SessionRepository};
use std::path::{Path, PathBuf};
use tokio::fs;

pub struct JsonSessionRepository {
    sessions_dir: PathBuf,
}

impl JsonSessionRepository {
    /// Creates a repository storing sessions under the project's `.kino/sessions`.
    pub fn for_project(paths: &KinoPaths) -> Self {
        Self::new(paths.sessions_dir())
    }

    pub fn new(sessions_dir: impl AsRef<Path>) -> Self {
        Self {
            sessions_dir: sessions_dir.as_ref().to_path_buf(),
        }
    }

    pub fn sessions_dir(&self) -> &Path {
        &self.sessions_dir
    }

    fn session_file(&self, session_id: &str) -> Result<PathBuf> {
        // Session ids become file names
        if session_id.is_empty()
            || session_id.contains(['/', '\\'])
            || session_id.starts_with('.')
        {
            return Err(KinoError::invalid_input(format!(
                "Invalid session id: '{session_id}'"
            )));
        }
        Ok(self.sessions_dir.join(format!("{session_id}.json")))
    }

    async fn read_session(path: &Path) -> Result<ChatSession> {
        let content = fs::read_to_string(path).await?;
        let document: SessionDocument =
            serde_json::from_str(&content).map_err(|e| KinoError::file_parse(path, e))?;

        if !document.is_supported() {
            return Err(KinoError::file_parse(
                path,
                format!("unsupported session format version {}", document.version),
            ));
        }
        Ok(document.session)
    }
}

#[async_trait]
impl SessionRepository for JsonSessionRepository {
    async fn list_all(&self) -> Result<Vec<ChatSession>> {
        let mut entries = match fs::read_dir(&self.sessions_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut sessions = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            match Self::read_session(&path).await {
                Ok(session) => sessions.push(session),
                Err(e) => tracing::warn!("[SessionRepository] Skipping session file: {}", e),
            }
        }

        sessions.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        tracing::debug!(
            "[SessionRepository] Loaded {} sessions from {}",
            sessions.len(),
            self.sessions_dir.display()
        );
        Ok(sessions)
    }

    async fn save(&self, session: &ChatSession) -> Result<()> {
        let path = self.session_file(&session.id)?;
        let json = serde_json::to_string_pretty(&SessionDocument::new(session.clone()))?;

        tokio::task::spawn_blocking(move || write_atomic(&path, json.as_bytes()))
            .await
            .map_err(|e| KinoError::internal(format!("Session write task failed: {e}")))?
    }

    async fn delete(&self, session_id: &str) -> Result<()> {
        let path = self.session_file(session_id)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use kino_core::session::{ChatMessage, MessageRole};
    use tempfile::TempDir;

    fn session_created_at(title: &str, offset_secs: i64) -> ChatSession {
        let mut session = ChatSession::new(title);
        session.created_at = Utc::now() + Duration::seconds(offset_secs);
        session
    }

    #[tokio::test]
    async fn test_missing_directory_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let repo = JsonSessionRepository::new(temp_dir.path().join("sessions"));
        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_and_list_sorted_by_creation() {
        let temp_dir = TempDir::new().unwrap();
        let repo = JsonSessionRepository::new(temp_dir.path().join("sessions"));

        let mut later = session_created_at("Session 2", 10);
        later.push(ChatMessage::new(MessageRole::User, "hello"));
        let earlier = session_created_at("Session 1", 0);

        repo.save(&later).await.unwrap();
        repo.save(&earlier).await.unwrap();

        let sessions = repo.list_all().await.unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].title, "Session 1");
        assert_eq!(sessions[1], later);
    }

    #[tokio::test]
    async fn test_file_shape_is_versioned() {
        let temp_dir = TempDir::new().unwrap();
        let repo = JsonSessionRepository::new(temp_dir.path());
        let session = ChatSession::new("Session 1");
        repo.save(&session).await.unwrap();

        let raw = std::fs::read_to_string(temp_dir.path().join(format!("{}.json", session.id))).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["session"]["title"], "Session 1");
    }

    #[tokio::test]
    async fn test_unreadable_files_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let repo = JsonSessionRepository::new(temp_dir.path());
        repo.save(&ChatSession::new("Session 1")).await.unwrap();

        std::fs::write(temp_dir.path().join("broken.json"), "{ nope").unwrap();
        std::fs::write(
            temp_dir.path().join("future.json"),
            r#"{"version":99,"session":{}}"#,
        )
        .unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

        let sessions = repo.list_all().await.unwrap();
        assert_eq!(sessions.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let repo = JsonSessionRepository::new(temp_dir.path());
        let session = ChatSession::new("Session 1");
        repo.save(&session).await.unwrap();

        repo.delete(&session.id).await.unwrap();
        repo.delete(&session.id).await.unwrap();
        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_path_like_ids() {
        let temp_dir = TempDir::new().unwrap();
        let repo = JsonSessionRepository::new(temp_dir.path());
        let result = repo.delete("../escape").await;
        assert!(matches!(result, Err(KinoError::InvalidInput(_))));
    }
}
