//! Error types for the core crate.

use thiserror::Error;

/// A server error the decoder could not classify.
///
/// Carries the original code and message so the fault can be diagnosed.
/// A fault is never mapped to a transaction state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized server error {code}: {reason}: {message}")]
pub struct DecodeFault {
    /// The numeric error code reported by the server.
    pub code: i32,
    /// The error message reported by the server.
    pub message: String,
    /// Why the error could not be classified.
    pub reason: String,
}

impl DecodeFault {
    /// Create a new decode fault.
    #[must_use]
    pub fn new(code: i32, message: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { code, message: message.into(), reason: reason.into() }
    }

    /// Fault for a code the marker table has no rule for.
    #[must_use]
    pub fn unknown_code(code: i32, message: impl Into<String>) -> Self {
        Self::new(code, message, "unknown error code")
    }

    /// Fault for a known code whose message matched none of its markers.
    #[must_use]
    pub fn unmatched_message(code: i32, message: impl Into<String>) -> Self {
        Self::new(code, message, "message matches no marker")
    }
}
