//! Error types for the advoca client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire advoca client.
///
/// Variants follow the client's error taxonomy: validation errors are
/// caught locally and never reach the backend, authentication errors carry
/// the backend's reason verbatim, and a credential rejection mid-session is
/// its own condition because the gateway has already terminated the session
/// by the time the caller sees it.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AdvocaError {
    /// Input rejected locally before any network call.
    #[error("{0}")]
    Validation(String),

    /// Backend-reported authentication failure (login/signup), verbatim.
    #[error("{0}")]
    Auth(String),

    /// Credential rejected mid-session; the session has been terminated.
    #[error("Your session has expired. Please sign in again.")]
    Unauthorized,

    /// Network-level failure before a response was received.
    #[error("Network error: {0}")]
    Transport(String),

    /// Non-auth failure reported by the server.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// IO error (file system operations).
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error.
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AdvocaError {
    /// Creates a Validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an Auth error carrying the backend's reason.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Creates a Transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a Server error.
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Creates an IO error.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Serialization error.
    pub fn serialization(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Serialization {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Creates a Config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a Validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is the credential-rejection condition.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Check if this is a Transport error.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<std::io::Error> for AdvocaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for AdvocaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, AdvocaError>`.
pub type Result<T> = std::result::Result<T, AdvocaError>;
