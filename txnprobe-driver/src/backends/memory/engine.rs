//! In-memory driver implementation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;
use tracing::trace;
use txnprobe_core::{SessionId, SessionOptions, TxnNumber};

use super::server::{ServerState, ServerTxn, ServerTxnState};
use crate::driver::{CommandReply, Driver, DriverError, DriverResult, Namespace, ProbeCommand};
use crate::session::SessionContext;

/// Handle to a server session of the in-memory backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryHandle {
    lsid: SessionId,
}

impl MemoryHandle {
    /// The server-side session id.
    #[must_use]
    pub const fn lsid(&self) -> SessionId {
        self.lsid
    }
}

/// A driver whose server lives in process.
///
/// Besides the [`Driver`] operations it exposes administrative hooks that act
/// as other clients would: starting, committing and aborting transactions on
/// a session, and inserting documents.
///
/// # Example
///
/// ```ignore
/// let driver = MemoryDriver::new();
/// driver.begin_transaction(sid, 5)?;
///
/// let ctx = driver.create_session(sid, &SessionOptions::transacted())?;
/// assert_eq!(ctx.transaction_number(), 0);
/// ```
#[derive(Debug, Default)]
pub struct MemoryDriver {
    state: Mutex<ServerState>,
    commands_executed: AtomicU64,
}

impl MemoryDriver {
    /// Create a driver with an empty server.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> DriverResult<MutexGuard<'_, ServerState>> {
        self.state.lock().map_err(|e| DriverError::Internal(format!("server state poisoned: {e}")))
    }

    /// Start transaction `number` on session `id`, as another client would.
    ///
    /// # Errors
    ///
    /// Returns a `225` server error if a newer transaction already started
    /// on the session.
    pub fn begin_transaction(&self, id: SessionId, number: TxnNumber) -> DriverResult<()> {
        let mut state = self.lock()?;
        if let Some(txn) = state.sessions.get(&id) {
            if number < txn.number {
                return Err(DriverError::server(
                    225,
                    format!(
                        "Cannot start transaction {number} on session {id} because a newer transaction {} has already started.",
                        txn.number
                    ),
                ));
            }
        }

        state.sessions.insert(id, ServerTxn { number, state: ServerTxnState::InProgress });
        Ok(())
    }

    /// Commit the latest transaction on session `id`.
    ///
    /// # Errors
    ///
    /// Returns a `251` server error if the session has no transaction in
    /// progress.
    pub fn commit_transaction(&self, id: SessionId) -> DriverResult<()> {
        self.finish(id, ServerTxnState::Committed)
    }

    /// Abort the latest transaction on session `id`.
    ///
    /// # Errors
    ///
    /// Returns a `251` server error if the session has no transaction in
    /// progress.
    pub fn abort_transaction(&self, id: SessionId) -> DriverResult<()> {
        self.finish(id, ServerTxnState::Aborted)
    }

    fn finish(&self, id: SessionId, outcome: ServerTxnState) -> DriverResult<()> {
        let mut state = self.lock()?;
        match state.sessions.get_mut(&id) {
            Some(txn) if txn.state == ServerTxnState::InProgress => {
                txn.state = outcome;
                Ok(())
            }
            _ => Err(DriverError::server(251, format!("No transaction in progress on session {id}."))),
        }
    }

    /// The latest transaction the server saw on session `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the server state is poisoned.
    pub fn transaction_of(&self, id: SessionId) -> DriverResult<Option<(TxnNumber, ServerTxnState)>> {
        Ok(self.lock()?.sessions.get(&id).map(|txn| (txn.number, txn.state)))
    }

    /// Insert a document into `namespace`.
    ///
    /// # Errors
    ///
    /// Returns an error if the server state is poisoned.
    pub fn insert(&self, namespace: &Namespace, document: Value) -> DriverResult<()> {
        self.lock()?.collections.entry(namespace.clone()).or_default().push(document);
        Ok(())
    }

    /// All documents in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns an error if the server state is poisoned.
    pub fn documents(&self, namespace: &Namespace) -> DriverResult<Vec<Value>> {
        Ok(self.lock()?.collections.get(namespace).cloned().unwrap_or_default())
    }

    /// Make the next executed command fail with `error`.
    ///
    /// # Errors
    ///
    /// Returns an error if the server state is poisoned.
    pub fn inject_failure(&self, error: DriverError) -> DriverResult<()> {
        self.lock()?.pending_failure = Some(error);
        Ok(())
    }

    /// Number of commands executed so far, failed ones included.
    #[must_use]
    pub fn commands_executed(&self) -> u64 {
        self.commands_executed.load(Ordering::Relaxed)
    }
}

impl Driver for MemoryDriver {
    type Handle = MemoryHandle;

    fn create_session(
        &self,
        id: SessionId,
        options: &SessionOptions,
    ) -> DriverResult<SessionContext<Self::Handle>> {
        trace!(session = %id, causally_consistent = options.causally_consistent, "creating session");
        Ok(SessionContext::new(id, MemoryHandle { lsid: id }, options))
    }

    fn execute(
        &self,
        ctx: &SessionContext<Self::Handle>,
        command: &ProbeCommand,
    ) -> DriverResult<CommandReply> {
        self.commands_executed.fetch_add(1, Ordering::Relaxed);
        trace!(
            session = %ctx.id(),
            txn_number = ctx.transaction_number(),
            causally_consistent = ctx.is_causally_consistent(),
            namespace = %command.namespace(),
            write = command.is_write(),
            "executing command"
        );

        let mut state = self.lock()?;
        if let Some(err) = state.pending_failure.take() {
            return Err(err);
        }
        if ctx.has_active_transaction() {
            state.check_transaction(ctx.handle().lsid(), ctx).map_err(DriverError::from)?;
        }

        Ok(state.apply(command))
    }
}
