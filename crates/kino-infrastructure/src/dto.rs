//! On-disk document shapes.

use kino_core::session::ChatSession;
use serde::{Deserialize, Serialize};

/// Current `sessions/<id>.json` format.
pub const SESSION_FORMAT_VERSION: u32 = 1;

/// Envelope around a persisted chat session.
///
/// ```json
/// { "version": 1, "session": { "id": "...", "title": "Session 1", ... } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDocument {
    pub version: u32,
    pub session: ChatSession,
}

impl SessionDocument {
    pub fn new(session: ChatSession) -> Self {
        Self {
            version: SESSION_FORMAT_VERSION,
            session,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.version == SESSION_FORMAT_VERSION
    }
}
