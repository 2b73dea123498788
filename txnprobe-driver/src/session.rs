//! Client-side session bookkeeping.
//!
//! A [`SessionContext`] pairs the driver's handle to a server session with the
//! transaction bookkeeping the client sends along with every command.
//!
//! # Invariants
//!
//! - Transaction number `0` means no number has been assigned yet.
//! - The transaction number never decreases for a given context.
//!
//! # Thread Safety
//!
//! A context is mutable, session-scoped state. It must not be shared between
//! concurrent operations on the same session.

use txnprobe_core::{SessionId, SessionOptions, TxnNumber};

use crate::driver::{DriverError, DriverResult};

/// One logical client session bound to a server session.
#[derive(Debug)]
pub struct SessionContext<H> {
    id: SessionId,
    handle: H,
    causally_consistent: bool,
    txn_number: TxnNumber,
    active: bool,
    message_sent: bool,
}

impl<H> SessionContext<H> {
    /// Create a context with no transaction number and no active transaction.
    #[must_use]
    pub fn new(id: SessionId, handle: H, options: &SessionOptions) -> Self {
        Self {
            id,
            handle,
            causally_consistent: options.causally_consistent,
            txn_number: 0,
            active: false,
            message_sent: false,
        }
    }

    /// The session id.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// The driver's handle to the server session.
    #[must_use]
    pub const fn handle(&self) -> &H {
        &self.handle
    }

    /// Whether the session is causally consistent.
    #[must_use]
    pub const fn is_causally_consistent(&self) -> bool {
        self.causally_consistent
    }

    /// The current transaction number.
    #[must_use]
    pub const fn transaction_number(&self) -> TxnNumber {
        self.txn_number
    }

    /// Advance the transaction number to `number`.
    ///
    /// Numbers not greater than the current one are ignored. Returns `true`
    /// if the number changed.
    pub fn advance_transaction_number(&mut self, number: TxnNumber) -> bool {
        if number > self.txn_number {
            self.txn_number = number;
            true
        } else {
            false
        }
    }

    /// Whether a transaction is active.
    #[must_use]
    pub const fn has_active_transaction(&self) -> bool {
        self.active
    }

    /// Start a transaction at the current transaction number.
    ///
    /// Starting while a transaction is already active is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::SessionUnavailable`] if no transaction number
    /// has been assigned yet.
    pub fn start_transaction(&mut self) -> DriverResult<()> {
        if self.active {
            return Ok(());
        }
        if self.txn_number == 0 {
            return Err(DriverError::session_unavailable(format!(
                "session {} has no transaction number assigned",
                self.id
            )));
        }

        self.active = true;
        Ok(())
    }

    /// Whether a message was already sent in the current transaction.
    ///
    /// The server treats the first message of a transaction as its start.
    #[must_use]
    pub const fn message_sent_in_current_transaction(&self) -> bool {
        self.message_sent
    }

    /// Set whether a message was already sent in the current transaction.
    pub fn set_message_sent_in_current_transaction(&mut self, sent: bool) {
        self.message_sent = sent;
    }
}
