//! Marker pairs and the rule table the decoder consults.

use serde::{Deserialize, Serialize};

use super::codes;
use crate::types::{TransactionState, TxnNumber};

/// A prefix/suffix pair bracketing a transaction number in a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerPair {
    /// Text immediately before the number.
    pub prefix: String,
    /// Text immediately after the number.
    pub suffix: String,
}

impl MarkerPair {
    /// Create a marker pair.
    #[must_use]
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), suffix: suffix.into() }
    }

    /// Extract the number between the first occurrences of the prefix and suffix.
    ///
    /// Returns `None` if either marker is absent, if the suffix occurs before
    /// the end of the prefix, or if the text between them is not a
    /// non-negative integer once trimmed.
    #[must_use]
    pub fn extract(&self, message: &str) -> Option<TxnNumber> {
        let start = message.find(&self.prefix)? + self.prefix.len();
        let end = message.find(&self.suffix)?;
        if end < start {
            return None;
        }

        message[start..end].trim().parse::<TxnNumber>().ok().filter(|n| *n >= 0)
    }
}

/// Associates an error code and marker pair with the state it implies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerRule {
    /// The server error code this rule applies to.
    pub code: i32,
    /// The markers bracketing the transaction number.
    pub marker: MarkerPair,
    /// The state implied by a match, or `None` if the code alone does not
    /// determine one.
    pub state: Option<TransactionState>,
}

impl MarkerRule {
    /// Create a rule.
    #[must_use]
    pub const fn new(code: i32, marker: MarkerPair, state: Option<TransactionState>) -> Self {
        Self { code, marker, state }
    }
}

/// Ordered decoding rules.
///
/// Rules for the same code are tried in table order; the first whose markers
/// match wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerTable {
    rules: Vec<MarkerRule>,
}

impl MarkerTable {
    /// Create a table from explicit rules.
    #[must_use]
    pub fn new(rules: Vec<MarkerRule>) -> Self {
        Self { rules }
    }

    /// The rules applying to `code`, in table order.
    pub fn rules_for(&self, code: i32) -> impl Iterator<Item = &MarkerRule> {
        self.rules.iter().filter(move |rule| rule.code == code)
    }
}

impl Default for MarkerTable {
    /// The server's current phrasing.
    fn default() -> Self {
        Self::new(vec![
            MarkerRule::new(
                codes::TRANSACTION_TOO_OLD,
                MarkerPair::new("because a newer transaction ", " has already started"),
                None,
            ),
            MarkerRule::new(
                codes::NO_SUCH_TRANSACTION,
                MarkerPair::new("Transaction ", " has been aborted"),
                Some(TransactionState::Aborted),
            ),
            MarkerRule::new(
                codes::NO_SUCH_TRANSACTION,
                MarkerPair::new(
                    "Given transaction number ",
                    " does not match any in-progress transactions",
                ),
                Some(TransactionState::None),
            ),
            MarkerRule::new(
                codes::TRANSACTION_COMMITTED,
                MarkerPair::new("Transaction ", " has been committed"),
                Some(TransactionState::Committed),
            ),
        ])
    }
}
