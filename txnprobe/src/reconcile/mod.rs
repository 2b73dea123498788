//! Transaction reconciliation.
//!
//! The [`TransactionReconciler`] determines the server-side state of a
//! session's transaction when the client's own bookkeeping may be stale,
//! missing, or ahead of the server.
//!
//! # Algorithm
//!
//! ```text
//! START ──(not transacted)──────────────────────────────▶ NOT_SUPPORTING
//!   │
//!   ▼
//! PROBE ──(ok)─────────────────────────────────────────▶ IN
//!   │ error
//!   ▼
//! DECODE ──(number not ahead of ours)───────────────────▶ ABORTED | COMMITTED | NONE
//!   │ server number ahead of ours
//!   ▼
//! RETRY_PROBE at the server's number ──(ok)─────────────▶ IN
//!   │ error
//!   ▼
//! DECODE2 ──────────────────────────────────────────────▶ ABORTED | COMMITTED | NONE
//! ```
//!
//! At most one retry happens per call. An error the decoder cannot classify
//! ends the call with [`Error::DecodeFault`](crate::Error::DecodeFault).

mod locks;
mod reconciler;

pub use reconciler::TransactionReconciler;
