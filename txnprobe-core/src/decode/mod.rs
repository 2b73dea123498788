//! Server error decoding.
//!
//! The server never describes a transaction directly. It embeds the
//! authoritative transaction number as free text inside a templated error
//! message. This module locates that number by substring anchoring between a
//! fixed prefix and suffix, and maps the error code and template to a
//! [`TransactionState`](crate::TransactionState).
//!
//! The templates live in a [`MarkerTable`] so that a change in the server's
//! wording is a table change, not a code change.
//!
//! # Example
//!
//! ```ignore
//! use txnprobe_core::{ErrorCodeDecoder, TransactionState};
//!
//! let decoder = ErrorCodeDecoder::default();
//! let decoded = decoder.decode(251, "Transaction 7 has been aborted.")?;
//! assert_eq!(decoded.number, 7);
//! assert_eq!(decoded.state, Some(TransactionState::Aborted));
//! ```

mod decoder;
mod markers;


pub use decoder::{Decoded, ErrorCodeDecoder};
pub use markers::{MarkerPair, MarkerRule, MarkerTable};

/// Server error codes that carry transaction state.
pub mod codes {
    /// A newer transaction has already started on the session.
    pub const TRANSACTION_TOO_OLD: i32 = 225;
    /// The transaction was aborted, or no in-progress transaction matches.
    pub const NO_SUCH_TRANSACTION: i32 = 251;
    /// The transaction was committed.
    pub const TRANSACTION_COMMITTED: i32 = 256;
}
