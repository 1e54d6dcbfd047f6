//! Use cases of the Kino extension core.
//!
//! - [`tree_provider`] / [`providers`]: sidebar views over the `.kino` folder
//! - [`chat_store`]: chat sessions and the turn protocol
//! - [`commands`]: the host command surface
//! - [`shell`]: activation and wiring for one project

pub mod chat_store;
pub mod commands;
pub mod context;
pub mod nodes;
pub mod providers;
pub mod shell;
pub mod tree_provider;

pub use chat_store::ChatSessionStore;
pub use commands::{CommandOutcome, HostCommand, KinoCommands};
pub use context::ArtifactPromptContext;
pub use providers::{HooksProvider, McpProvider, SpecsProvider, SteeringProvider};
pub use shell::{ArtifactViews, KinoShell};
pub use tree_provider::ArtifactTreeProvider;
