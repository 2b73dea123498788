//! `txnprobe` Core
//!
//! This crate provides the value types shared by every `txnprobe` crate and the
//! decoder that turns a raw server error into transaction knowledge.
//!
//! # Modules
//!
//! - [`types`] - Session ids, session options and the reconciled transaction record
//! - [`decode`] - Marker tables and the server error decoder
//! - [`error`] - Error types

#![deny(clippy::unwrap_used)]

pub mod decode;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use decode::{Decoded, ErrorCodeDecoder, MarkerPair, MarkerRule, MarkerTable};
pub use error::DecodeFault;
pub use types::{SessionId, SessionOptions, Transaction, TransactionState, TxnNumber};
