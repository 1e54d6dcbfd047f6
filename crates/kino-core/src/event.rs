//! Events that flow from storage and chat turns out to the host UI.
//!
//! Watch events carry only the category that changed; consumers treat them as
//! "invalidate and re-scan". Chat events mirror what the chat panel renders.

use crate::session::ChatMessage;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

/// The four watched subdirectories of `.kino`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactCategory {
    Specs,
    Hooks,
    Steering,
    Settings,
}

impl ArtifactCategory {
    pub const ALL: [ArtifactCategory; 4] = [
        ArtifactCategory::Specs,
        ArtifactCategory::Hooks,
        ArtifactCategory::Steering,
        ArtifactCategory::Settings,
    ];

    /// Subdirectory name under `.kino`.
    pub fn dir_name(self) -> &'static str {
        match self {
            ArtifactCategory::Specs => "specs",
            ArtifactCategory::Hooks => "hooks",
            ArtifactCategory::Steering => "steering",
            ArtifactCategory::Settings => "settings",
        }
    }

    /// Event name emitted when the category changes (`specs-changed`, ...).
    pub fn event_name(self) -> &'static str {
        match self {
            ArtifactCategory::Specs => "specs-changed",
            ArtifactCategory::Hooks => "hooks-changed",
            ArtifactCategory::Steering => "steering-changed",
            ArtifactCategory::Settings => "settings-changed",
        }
    }
}

impl fmt::Display for ArtifactCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

const BUS_CAPACITY: usize = 64;

/// Typed publish/subscribe bus with one topic per [`ArtifactCategory`].
///
/// Cloning the bus yields another handle to the same channel. Publishing with
/// no subscribers is not an error.
#[derive(Debug, Clone)]
pub struct ArtifactEventBus {
    sender: broadcast::Sender<ArtifactCategory>,
}

impl ArtifactEventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(BUS_CAPACITY);
        Self { sender }
    }

    pub fn publish(&self, category: ArtifactCategory) {
        // Err only means nobody is listening right now
        let _ = self.sender.send(category);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ArtifactCategory> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ArtifactEventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// What the chat panel is told while a turn runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ChatEvent {
    /// A message was appended to the current session.
    AddMessage { message: ChatMessage },
    /// Shows or hides the typing indicator.
    SetTyping { typing: bool },
    /// A turn failed; rendered inline as an error-styled message.
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bus_delivers_to_every_subscriber() {
        let bus = ArtifactEventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.clone().subscribe();

        bus.publish(ArtifactCategory::Hooks);

        assert_eq!(first.recv().await.unwrap(), ArtifactCategory::Hooks);
        assert_eq!(second.recv().await.unwrap(), ArtifactCategory::Hooks);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = ArtifactEventBus::new();
        bus.publish(ArtifactCategory::Specs);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_event_names() {
        let names: Vec<_> = ArtifactCategory::ALL.iter().map(|c| c.event_name()).collect();
        assert_eq!(
            names,
            vec!["specs-changed", "hooks-changed", "steering-changed", "settings-changed"]
        );
    }
}
