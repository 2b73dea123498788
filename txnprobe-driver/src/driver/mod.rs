//! Driver traits and abstractions.
//!
//! - [`Driver`] - Creates session contexts and executes commands in them
//! - [`ProbeCommand`] - The command shapes a probe can issue
//! - [`DriverError`] - Everything a driver call can fail with

mod command;
mod error;
mod traits;

pub use command::{CommandReply, Filter, Namespace, ProbeCommand};
pub use error::{DriverError, DriverResult, ServerError};
pub use traits::Driver;
