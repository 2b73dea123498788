//! Options negotiated when a session was opened.

use serde::{Deserialize, Serialize};

/// The options a client session was opened with.
///
/// Looked up by session id; treated as read-only input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SessionOptions {
    /// Whether reads in the session observe the session's prior writes.
    pub causally_consistent: bool,
    /// Whether the session runs multi-operation transactions.
    pub transacted: bool,
}

impl SessionOptions {
    /// Create session options.
    #[must_use]
    pub const fn new(causally_consistent: bool, transacted: bool) -> Self {
        Self { causally_consistent, transacted }
    }

    /// Options for a session that runs transactions.
    #[must_use]
    pub const fn transacted() -> Self {
        Self::new(true, true)
    }

    /// Options for a session without transactions.
    #[must_use]
    pub const fn non_transacted() -> Self {
        Self::new(true, false)
    }
}
