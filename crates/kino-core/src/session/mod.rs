//! Chat session domain module.
//!
//! # Module Structure
//!
//! - `message`: Conversation message types (`MessageRole`, `ChatMessage`)
//! - `mode`: Chat modes that steer the system prompt (`ChatMode`)
//! - `model`: The session aggregate (`ChatSession`)
//! - `repository`: Repository trait for session persistence

mod message;
mod mode;
mod model;
mod repository;

pub use message::{ChatMessage, MessageContext, MessageRole};
pub use mode::ChatMode;
pub use model::{ChatSession, DEFAULT_MODE, DEFAULT_MODEL};
pub use repository::SessionRepository;
