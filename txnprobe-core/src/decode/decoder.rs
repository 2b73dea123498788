//! The server error decoder.

use super::MarkerTable;
use crate::error::DecodeFault;
use crate::types::{TransactionState, TxnNumber};

/// What a server error revealed about a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    /// The transaction number the server embedded in its message.
    pub number: TxnNumber,
    /// The state the error implies, if the code determines one.
    ///
    /// `None` for "a newer transaction has already started": the caller has to
    /// probe again at [`number`](Self::number) to learn the state.
    pub state: Option<TransactionState>,
}

/// Turns a server error code and message into a [`Decoded`] value.
///
/// Pure: the same input always yields the same output.
#[derive(Debug, Clone, Default)]
pub struct ErrorCodeDecoder {
    table: MarkerTable,
}

impl ErrorCodeDecoder {
    /// Create a decoder over a custom marker table.
    #[must_use]
    pub const fn new(table: MarkerTable) -> Self {
        Self { table }
    }

    /// Decode a server error.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeFault`] if no rule exists for `code`, or if the
    /// message matches none of the code's markers. A fault never stands in
    /// for a default state.
    pub fn decode(&self, code: i32, message: &str) -> Result<Decoded, DecodeFault> {
        let mut known = false;
        for rule in self.table.rules_for(code) {
            known = true;
            if let Some(number) = rule.marker.extract(message) {
                return Ok(Decoded { number, state: rule.state });
            }
        }

        if known {
            Err(DecodeFault::unmatched_message(code, message))
        } else {
            Err(DecodeFault::unknown_code(code, message))
        }
    }
}
