//! In-memory driver backend.
//!
//! [`MemoryDriver`] keeps the server's per-session transaction records and a
//! set of JSON collections in process, and answers transactional commands
//! with the same error codes and message templates the server uses:
//!
//! | Client number vs. server record | Answer |
//! |---|---|
//! | lower | `225` "... because a newer transaction M has already started." |
//! | equal, in progress | success |
//! | equal, aborted | `251` "Transaction N has been aborted." |
//! | equal, committed | `256` "Transaction N has been committed." |
//! | higher or no record, first message | starts transaction N |
//! | higher or no record, later message | `251` "Given transaction number N does not match any in-progress transactions." |
//!
//! # Example
//!
//! ```ignore
//! use txnprobe_driver::backends::MemoryDriver;
//!
//! let driver = MemoryDriver::new();
//! driver.begin_transaction(sid, 5)?;
//! driver.commit_transaction(sid)?;
//! ```

mod engine;
mod server;

pub use engine::{MemoryDriver, MemoryHandle};
pub use server::ServerTxnState;
