//! `txnprobe` Driver
//!
//! This crate defines the boundary between transaction state discovery and
//! the database driver that actually talks to the server, plus an in-memory
//! backend that behaves like the server for the commands `txnprobe` issues.
//!
//! # Overview
//!
//! A driver creates [`SessionContext`]s bound to a server session and executes
//! [`ProbeCommand`]s inside them. The context carries the client-side
//! transaction bookkeeping the server checks on every command: the
//! transaction number, whether a transaction is active, and whether a message
//! was already sent in it.
//!
//! # Error Handling
//!
//! All driver operations return [`DriverResult<T>`]. A structured server
//! answer surfaces as [`DriverError::Server`] carrying the numeric code and
//! message untouched, so callers can decode it.
//!
//! # Example
//!
//! ```ignore
//! use txnprobe_core::{SessionId, SessionOptions};
//! use txnprobe_driver::backends::MemoryDriver;
//! use txnprobe_driver::{Driver, Namespace, ProbeCommand};
//!
//! let driver = MemoryDriver::new();
//! let mut ctx = driver.create_session(SessionId::random(), &SessionOptions::transacted())?;
//! ctx.advance_transaction_number(1);
//! ctx.start_transaction()?;
//!
//! let ns = Namespace::new("__txnprobe", "probe");
//! driver.execute(&ctx, &ProbeCommand::find(ns, "_id", 1))?;
//! ```
//!
//! # Modules
//!
//! - [`driver`] - Driver traits, commands and errors
//! - [`session`] - Client-side session bookkeeping
//! - [`backends`] - Concrete driver implementations

#![deny(clippy::unwrap_used)]

pub mod backends;
pub mod driver;
pub mod session;

pub use driver::{
    CommandReply, Driver, DriverError, DriverResult, Filter, Namespace, ProbeCommand, ServerError,
};
pub use session::SessionContext;
