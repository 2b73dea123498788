//! Driver error types.

use std::fmt;

use thiserror::Error;

/// A structured error answered by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerError {
    /// The numeric error code.
    pub code: i32,
    /// The error message.
    pub message: String,
}

impl ServerError {
    /// Create a server error.
    #[must_use]
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {}", self.code, self.message)
    }
}

/// Errors that can occur in driver operations.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The server answered with an error.
    #[error("server error {0}")]
    Server(ServerError),

    /// The server could not be reached.
    #[error("connection error: {0}")]
    Connection(String),

    /// The session cannot be used for the requested operation.
    #[error("session unavailable: {0}")]
    SessionUnavailable(String),

    /// An internal driver error occurred.
    #[error("internal driver error: {0}")]
    Internal(String),
}

impl DriverError {
    /// Create a server error.
    #[must_use]
    pub fn server(code: i32, message: impl Into<String>) -> Self {
        Self::Server(ServerError::new(code, message))
    }

    /// Create a session-unavailable error.
    #[must_use]
    pub fn session_unavailable(msg: impl Into<String>) -> Self {
        Self::SessionUnavailable(msg.into())
    }

    /// The server error, if the server answered.
    #[must_use]
    pub const fn as_server_error(&self) -> Option<&ServerError> {
        match self {
            Self::Server(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ServerError> for DriverError {
    fn from(err: ServerError) -> Self {
        Self::Server(err)
    }
}

/// Result type alias for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;
