//! `txnprobe` - Server-Side Transaction State Discovery
//!
//! The server never answers "what is the state of transaction N on session
//! S?". `txnprobe` infers it: it issues a cheap probe command inside the
//! session's transaction and classifies the outcome. Success means the
//! transaction is active; a structured server error tells whether it was
//! superseded, aborted, committed or unknown, and carries the authoritative
//! transaction number when the client's guess was stale.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use txnprobe::{SessionRegistry, TransactionReconciler};
//! use txnprobe_core::SessionOptions;
//! use txnprobe_driver::backends::MemoryDriver;
//!
//! // One driver for the whole process, shared by reference
//! let driver = Arc::new(MemoryDriver::new());
//!
//! let registry = SessionRegistry::new();
//! let sid = registry.open(SessionOptions::transacted())?;
//!
//! let reconciler = TransactionReconciler::new(driver, registry);
//! let txn = reconciler.reconcile(sid)?;
//! println!("{txn}");
//! ```
//!
//! # Configuration
//!
//! Use [`ReconcilerBuilder`] to change the probe namespace, the probe mode or
//! the marker table the decoder uses:
//!
//! ```ignore
//! use txnprobe::{ProbeMode, ReconcilerBuilder};
//!
//! let reconciler = ReconcilerBuilder::new()
//!     .probe_mode(ProbeMode::Write)
//!     .build(driver, registry)?;
//! ```
//!
//! # Modules
//!
//! - [`config`] - Reconciler configuration and builder
//! - [`error`] - Error types
//! - [`metrics`] - Reconciliation counters
//! - [`probe`] - Probe commands
//! - [`reconcile`] - The reconciler
//! - [`sessions`] - Session-options providers

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

// Re-export core types
pub use txnprobe_core::{
    DecodeFault, ErrorCodeDecoder, MarkerPair, MarkerRule, MarkerTable, SessionId, SessionOptions,
    Transaction, TransactionState, TxnNumber,
};

// Re-export driver types
pub use txnprobe_driver::{Driver, DriverError, Namespace, SessionContext};

// Modules
pub mod config;
pub mod error;
pub mod metrics;
pub mod probe;
pub mod reconcile;
pub mod sessions;

// Public API re-exports
pub use config::{ProbeMode, ReconcilerBuilder, ReconcilerConfig};
pub use error::{Error, Result};
pub use metrics::{ReconcileMetrics, ReconcileMetricsSnapshot};
pub use probe::ProbeRunner;
pub use reconcile::TransactionReconciler;
pub use sessions::{EmbeddedOptions, SessionOptionsProvider, SessionRegistry};
