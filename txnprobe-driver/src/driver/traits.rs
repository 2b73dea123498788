//! Core driver trait.

use txnprobe_core::{SessionId, SessionOptions};

use super::{CommandReply, DriverResult, ProbeCommand};
use crate::session::SessionContext;

/// A connection to the server that runs commands inside client sessions.
///
/// Drivers are constructed once at startup and shared by reference; they own
/// connection pooling, credentials, read/write concerns and timeouts.
/// Implementations must be thread-safe (`Send + Sync`).
///
/// # Example
///
/// ```ignore
/// use txnprobe_driver::{Driver, DriverResult, Namespace, ProbeCommand};
///
/// fn probe<D: Driver>(driver: &D, ctx: &mut SessionContext<D::Handle>) -> DriverResult<()> {
///     ctx.start_transaction()?;
///     driver.execute(ctx, &ProbeCommand::find(Namespace::new("db", "coll"), "_id", 1))?;
///     Ok(())
/// }
/// ```
pub trait Driver: Send + Sync {
    /// The driver's opaque handle to a server session.
    type Handle: Send;

    /// Create a session context bound to the server session `id`.
    ///
    /// The returned context has transaction number `0` and no active
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::SessionUnavailable`](super::DriverError::SessionUnavailable)
    /// if no server session can be acquired, or a connection error.
    fn create_session(
        &self,
        id: SessionId,
        options: &SessionOptions,
    ) -> DriverResult<SessionContext<Self::Handle>>;

    /// Execute a command in the given session context.
    ///
    /// If the context has an active transaction, the command is sent with the
    /// context's transaction number and starts a new server transaction only
    /// when no message was sent in the current transaction yet.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Server`](super::DriverError::Server) with the
    /// server's code and message unchanged if the server rejects the command.
    fn execute(
        &self,
        ctx: &SessionContext<Self::Handle>,
        command: &ProbeCommand,
    ) -> DriverResult<CommandReply>;

    /// Return a session context to the driver.
    ///
    /// The default implementation simply drops it.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to release the server session.
    fn release_session(&self, ctx: SessionContext<Self::Handle>) -> DriverResult<()> {
        drop(ctx);
        Ok(())
    }
}
