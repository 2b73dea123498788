//! Driver backend implementations.
//!
//! # Available Backends
//!
//! - [`memory`] - In-process server simulation for tests and embedding

pub mod memory;

pub use self::memory::{MemoryDriver, MemoryHandle, ServerTxnState};
