//! Error types for Kino.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// A shared error type for every Kino crate.
///
/// Variants map onto the failure classes a host has to react to differently:
/// configuration problems prompt the user, upstream and network failures end a
/// single chat turn, per-file parse failures are logged and skipped, and
/// directory initialization failures abort activation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KinoError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Missing API key, unknown provider, unreadable settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// A chat turn was requested while no session is current
    #[error("No active chat session")]
    NoActiveSession,

    /// The completion endpoint answered with a non-success status
    #[error("API Error {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The completion endpoint answered with an unexpected payload shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The completion request exceeded its configured bound
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Transport-level failure talking to a remote endpoint
    #[error("Network error: {0}")]
    Network(String),

    /// A single artifact file could not be parsed
    #[error("Failed to parse {path}: {message}")]
    FileParse { path: PathBuf, message: String },

    /// The hidden project directory structure could not be created
    #[error("Failed to initialize directory {path}: {message}")]
    DirectoryInit { path: PathBuf, message: String },

    /// Rejected user input (artifact names, command arguments)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl KinoError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// The error raised when no API key is stored for the active provider.
    pub fn missing_credential(provider: &str) -> Self {
        Self::Config(format!(
            "API key not configured. Please set your {provider} API key."
        ))
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Serialization error for the given format
    pub fn serialization(format: &str, message: impl ToString) -> Self {
        Self::Serialization {
            format: format.to_string(),
            message: message.to_string(),
        }
    }

    pub fn file_parse(path: &Path, message: impl ToString) -> Self {
        Self::FileParse {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    pub fn directory_init(path: &Path, err: &std::io::Error) -> Self {
        Self::DirectoryInit {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    /// Creates an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Check if this is an upstream (non-2xx) error
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. })
    }

    /// Whether the error belongs to one chat turn rather than to the store.
    ///
    /// Turn errors are reported inline in the conversation and leave the
    /// session usable for the next message.
    pub fn is_turn_failure(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::Upstream { .. }
                | Self::MalformedResponse(_)
                | Self::Timeout { .. }
                | Self::Network(_)
        )
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for KinoError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for KinoError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization("JSON", err)
    }
}

/// A type alias for `Result<T, KinoError>`.
pub type Result<T> = std::result::Result<T, KinoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_display_keeps_status_and_body() {
        let err = KinoError::Upstream {
            status: 401,
            body: "{\"error\":\"bad key\"}".to_string(),
        };
        assert_eq!(err.to_string(), "API Error 401: {\"error\":\"bad key\"}");
        assert!(err.is_upstream());
        assert!(err.is_turn_failure());
    }

    #[test]
    fn test_missing_credential_is_config() {
        let err = KinoError::missing_credential("DeepSeek");
        assert!(err.is_config());
        assert!(err.to_string().contains("DeepSeek API key"));
    }

    #[test]
    fn test_store_errors_are_not_turn_failures() {
        assert!(!KinoError::NoActiveSession.is_turn_failure());
        assert!(!KinoError::not_found("Session", "abc").is_turn_failure());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: KinoError = io.into();
        match err {
            KinoError::Io { message } => assert!(message.contains("PermissionDenied")),
            other => panic!("Expected Io error, got {other:?}"),
        }
    }
}
