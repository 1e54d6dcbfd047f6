//! Chat session domain model.

use super::message::ChatMessage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MODE: &str = "chat";
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// A conversation held in the chat panel.
///
/// Messages keep insertion order. Mode and model record the panel defaults for
/// the session; each message also carries the mode/model it was sent with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// Human-readable session title
    pub title: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub mode: String,
    pub model: String,
}

impl ChatSession {
    /// Creates an empty session with the default mode and model.
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
            mode: DEFAULT_MODE.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Appends a message and bumps `updated_at`.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.touch();
    }
}
