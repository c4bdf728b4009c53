//! Core Error Types
//!
//! Defines the error taxonomy used across the Ledgerlens workspace.
//! These error types are dependency-free (only thiserror + std) to keep the
//! core crate lightweight.
//!
//! The taxonomy mirrors how a verification attempt can fail: rejected before
//! the network (`Validation`), rejected by the session (`Auth`), unable to
//! reach the collaborator (`Network`), refused by it with a message
//! (`Server`), or answered with an unusable body (`Parse`). None of these is
//! fatal to the process; every one is recoverable by a fresh user action.

use thiserror::Error;

/// Core error type for the Ledgerlens workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Rejected locally before any network call (bad file type, bad input)
    #[error("Validation error: {0}")]
    Validation(String),

    /// The session is missing or expired (401 from any call)
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The request could not reach the verification service
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered with a structured error message
    #[error("Server error: {0}")]
    Server(String),

    /// A 2xx response body was not parseable as the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// The upload slot is occupied by an in-flight chain
    #[error("Busy: {0}")]
    Busy(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a server error
    pub fn server(msg: impl Into<String>) -> Self {
        Self::Server(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a busy error
    pub fn busy(msg: impl Into<String>) -> Self {
        Self::Busy(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error means the session has expired
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}

/// Convert CoreError to a string
impl From<CoreError> for String {
    fn from(err: CoreError) -> String {
        err.to_string()
    }
}
