//! Session repository trait.

use super::model::ChatSession;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for chat session persistence.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Lists all stored sessions, oldest first.
    async fn list_all(&self) -> Result<Vec<ChatSession>>;

    /// Saves (creates or replaces) a session.
    async fn save(&self, session: &ChatSession) -> Result<()>;

    /// Deletes a session. Deleting a missing session is not an error.
    async fn delete(&self, session_id: &str) -> Result<()>;
}
