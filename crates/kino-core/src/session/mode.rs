use serde::{Deserialize, Serialize};
use std::fmt;

/// The interaction mode selected in the chat panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    #[default]
    Chat,
    Plan,
    Edit,
    Reasoning,
}

impl ChatMode {
    /// Maps a mode name to a mode; unknown names fall back to `Chat`.
    pub fn parse(mode: &str) -> Self {
        match mode.trim().to_ascii_lowercase().as_str() {
            "plan" => ChatMode::Plan,
            "edit" => ChatMode::Edit,
            "reasoning" => ChatMode::Reasoning,
            _ => ChatMode::Chat,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChatMode::Chat => "chat",
            ChatMode::Plan => "plan",
            ChatMode::Edit => "edit",
            ChatMode::Reasoning => "reasoning",
        }
    }
}

impl fmt::Display for ChatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
