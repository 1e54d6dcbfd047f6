//! Low-level file storage.
//!
//! - `atomic_toml`: temp-file + rename writes and TOML documents
//! - `secret_storage`: the per-user secret.json file

pub mod atomic_toml;
pub mod secret_storage;

pub use atomic_toml::{AtomicTomlFile, write_atomic};
pub use secret_storage::SecretStorage;
