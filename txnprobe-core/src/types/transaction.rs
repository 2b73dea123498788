//! The reconciled transaction record.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A transaction sequence number.
///
/// `0` means no number has been assigned to the session yet.
pub type TxnNumber = i64;

/// The server-side state of a session's transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionState {
    /// The session does not use transactions.
    NotSupporting,
    /// The transaction is active on the server.
    In,
    /// The server aborted the transaction.
    Aborted,
    /// The server committed the transaction.
    Committed,
    /// No in-progress transaction matches the number.
    None,
}

impl TransactionState {
    /// The canonical upper-case name of the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotSupporting => "NOT_SUPPORTING",
            Self::In => "IN",
            Self::Aborted => "ABORTED",
            Self::Committed => "COMMITTED",
            Self::None => "NONE",
        }
    }
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transaction number together with the state the server reported for it.
///
/// The number is the one the server actually evaluated, which is not
/// necessarily the number the client guessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transaction {
    number: TxnNumber,
    state: TransactionState,
}

impl Transaction {
    /// Create a transaction record.
    #[must_use]
    pub const fn new(number: TxnNumber, state: TransactionState) -> Self {
        Self { number, state }
    }

    /// The record for a session that does not use transactions.
    #[must_use]
    pub const fn not_supporting() -> Self {
        Self::new(0, TransactionState::NotSupporting)
    }

    /// The transaction number.
    #[must_use]
    pub const fn number(&self) -> TxnNumber {
        self.number
    }

    /// The transaction state.
    #[must_use]
    pub const fn state(&self) -> TransactionState {
        self.state
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "txn {} {}", self.number, self.state)
    }
}
