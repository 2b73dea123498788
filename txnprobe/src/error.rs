//! Error types for `txnprobe`.
//!
//! This module provides the [`enum@Error`] type returned by reconciliation.

use thiserror::Error;
use txnprobe_core::{DecodeFault, SessionId};
use txnprobe_driver::DriverError;

/// Errors that can occur while reconciling a session's transaction.
///
/// Anything the server answered in a recognizable way resolves to a
/// [`Transaction`](crate::Transaction) instead of an error.
#[derive(Debug, Error)]
pub enum Error {
    /// No session options are known for the session id.
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    /// The server answered with an error that could not be classified.
    #[error(transparent)]
    DecodeFault(#[from] DecodeFault),

    /// The driver failed without a server answer.
    #[error("driver error: {0}")]
    Driver(#[from] DriverError),

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Config(String),

    /// An internal lock was poisoned (a thread panicked while holding it).
    #[error("internal lock poisoned: {0}")]
    LockPoisoned(String),
}

impl Error {
    /// Returns `true` if the session id was unknown.
    #[must_use]
    pub const fn is_session_not_found(&self) -> bool {
        matches!(self, Self::SessionNotFound(_))
    }

    /// Returns `true` if a server error could not be classified.
    #[must_use]
    pub const fn is_decode_fault(&self) -> bool {
        matches!(self, Self::DecodeFault(_))
    }

    /// Create a config error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a lock poisoned error.
    #[must_use]
    pub fn lock_poisoned(msg: impl Into<String>) -> Self {
        Self::LockPoisoned(msg.into())
    }
}

/// A specialized `Result` type for `txnprobe` operations.
pub type Result<T> = std::result::Result<T, Error>;
