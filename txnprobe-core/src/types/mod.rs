//! Core data types for `txnprobe`.
//!
//! This module defines the session identity, the options a session was opened
//! with, and the reconciled transaction record.

mod id;
mod options;
mod transaction;

pub use id::SessionId;
pub use options::SessionOptions;
pub use transaction::{Transaction, TransactionState, TxnNumber};
