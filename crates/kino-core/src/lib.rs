//! Domain models and service traits shared by every Kino crate.
//!
//! Nothing in here touches the filesystem or the network. Storage lives in
//! `kino-infrastructure`, the completion client in `kino-interaction`, and the
//! use cases that tie them together in `kino-application`.

pub mod artifact;
pub mod completion;
pub mod config;
pub mod error;
pub mod event;
pub mod hook;
pub mod mcp;
pub mod secret;
pub mod session;
pub mod spec;
pub mod steering;
pub mod tree;

// Re-export common error type
pub use error::{KinoError, Result};
