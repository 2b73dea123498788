//! Server-side state of the in-memory backend.

use std::collections::HashMap;

use serde_json::Value;
use txnprobe_core::{SessionId, TxnNumber};

use crate::driver::{CommandReply, DriverError, Namespace, ProbeCommand, ServerError};
use crate::session::SessionContext;

const TRANSACTION_TOO_OLD: i32 = 225;
const NO_SUCH_TRANSACTION: i32 = 251;
const TRANSACTION_COMMITTED: i32 = 256;

/// State of the latest transaction the server saw on a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerTxnState {
    /// The transaction accepts further commands.
    InProgress,
    /// The transaction was committed.
    Committed,
    /// The transaction was aborted.
    Aborted,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct ServerTxn {
    pub(super) number: TxnNumber,
    pub(super) state: ServerTxnState,
}

#[derive(Debug, Default)]
pub(super) struct ServerState {
    pub(super) sessions: HashMap<SessionId, ServerTxn>,
    pub(super) collections: HashMap<Namespace, Vec<Value>>,
    pub(super) pending_failure: Option<DriverError>,
}

impl ServerState {
    /// Check the context's transaction bookkeeping against the record of
    /// server session `lsid`.
    ///
    /// Starts a new server transaction when the context is ahead of the
    /// record and has not sent a message in its current transaction yet.
    pub(super) fn check_transaction<H>(
        &mut self,
        lsid: SessionId,
        ctx: &SessionContext<H>,
    ) -> Result<(), ServerError> {
        let number = ctx.transaction_number();

        match self.sessions.get(&lsid).copied() {
            Some(txn) if number < txn.number => Err(ServerError::new(
                TRANSACTION_TOO_OLD,
                format!(
                    "Cannot start transaction {number} on session {lsid} because a newer transaction {} has already started.",
                    txn.number
                ),
            )),
            Some(txn) if number == txn.number => match txn.state {
                ServerTxnState::InProgress => Ok(()),
                ServerTxnState::Aborted => Err(ServerError::new(
                    NO_SUCH_TRANSACTION,
                    format!("Transaction {number} has been aborted."),
                )),
                ServerTxnState::Committed => Err(ServerError::new(
                    TRANSACTION_COMMITTED,
                    format!("Transaction {number} has been committed."),
                )),
            },
            _ if !ctx.message_sent_in_current_transaction() => {
                self.sessions.insert(lsid, ServerTxn { number, state: ServerTxnState::InProgress });
                Ok(())
            }
            _ => Err(ServerError::new(
                NO_SUCH_TRANSACTION,
                format!(
                    "Given transaction number {number} does not match any in-progress transactions."
                ),
            )),
        }
    }

    /// Apply a command that passed the transaction check.
    pub(super) fn apply(&mut self, command: &ProbeCommand) -> CommandReply {
        match command {
            ProbeCommand::Find { namespace, projection, limit } => {
                let documents = self
                    .collections
                    .get(namespace)
                    .map(|docs| {
                        docs.iter()
                            .take(*limit as usize)
                            .map(|doc| project(doc, projection))
                            .collect()
                    })
                    .unwrap_or_default();
                CommandReply { documents, ..CommandReply::default() }
            }
            ProbeCommand::UpdateOne { namespace, filter, field, value } => {
                let Some(doc) = self
                    .collections
                    .get_mut(namespace)
                    .and_then(|docs| docs.iter_mut().find(|doc| filter.matches(doc)))
                else {
                    return CommandReply::default();
                };

                let mut reply = CommandReply { matched: 1, ..CommandReply::default() };
                if let Some(object) = doc.as_object_mut() {
                    if object.get(field) != Some(value) {
                        object.insert(field.clone(), value.clone());
                        reply.modified = 1;
                    }
                }
                reply
            }
        }
    }
}

fn project(doc: &Value, field: &str) -> Value {
    let mut projected = serde_json::Map::new();
    if let Some(value) = doc.get(field) {
        projected.insert(field.to_string(), value.clone());
    }
    Value::Object(projected)
}
