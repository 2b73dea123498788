//! Probe commands.
//!
//! A probe issues one minimal command in a session's transaction and reports
//! the raw outcome. It never interprets server errors; that is the decoder's
//! job.

use serde_json::json;
use tracing::debug;
use txnprobe_driver::{Driver, DriverResult, Filter, Namespace, ProbeCommand, SessionContext};

use crate::config::ProbeMode;

/// Field the write probe would set if its filter ever matched.
const WRITE_PROBE_FIELD: &str = "__txnprobe";

/// Issues probe commands against a reserved namespace.
#[derive(Debug, Clone)]
pub struct ProbeRunner {
    namespace: Namespace,
    projection_field: String,
}

impl ProbeRunner {
    /// Create a probe runner.
    #[must_use]
    pub fn new(namespace: Namespace, projection_field: impl Into<String>) -> Self {
        Self { namespace, projection_field: projection_field.into() }
    }

    /// The namespace probes run against.
    #[must_use]
    pub const fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Run the probe selected by `mode`.
    ///
    /// # Errors
    ///
    /// See [`probe_read`](Self::probe_read) and [`probe_write`](Self::probe_write).
    pub fn probe<D: Driver>(
        &self,
        mode: ProbeMode,
        driver: &D,
        ctx: &mut SessionContext<D::Handle>,
    ) -> DriverResult<()> {
        match mode {
            ProbeMode::Read => self.probe_read(driver, ctx),
            ProbeMode::Write => self.probe_write(driver, ctx),
        }
    }

    /// Read at most one document, projected to a single field.
    ///
    /// If the context has no active transaction, one is started and marked
    /// as already messaged, so the server evaluates the probe against its
    /// existing transaction instead of starting a new one.
    ///
    /// # Errors
    ///
    /// Returns the driver error unchanged, including server errors.
    pub fn probe_read<D: Driver>(
        &self,
        driver: &D,
        ctx: &mut SessionContext<D::Handle>,
    ) -> DriverResult<()> {
        if !ctx.has_active_transaction() {
            ctx.start_transaction()?;
            ctx.set_message_sent_in_current_transaction(true);
        }

        debug!(
            session = %ctx.id(),
            txn_number = ctx.transaction_number(),
            namespace = %self.namespace,
            "read probe"
        );
        driver.execute(ctx, &self.read_command()).map(|_| ())
    }

    /// Issue an update whose filter no document can satisfy.
    ///
    /// The context's "message sent" flag is restored afterwards, whatever the
    /// outcome.
    ///
    /// # Errors
    ///
    /// Returns the driver error unchanged, including server errors.
    pub fn probe_write<D: Driver>(
        &self,
        driver: &D,
        ctx: &mut SessionContext<D::Handle>,
    ) -> DriverResult<()> {
        let message_sent = ctx.message_sent_in_current_transaction();
        ctx.set_message_sent_in_current_transaction(true);

        debug!(
            session = %ctx.id(),
            txn_number = ctx.transaction_number(),
            namespace = %self.namespace,
            "write probe"
        );
        let result = match ctx.start_transaction() {
            Ok(()) => driver.execute(ctx, &self.write_command()).map(|_| ()),
            Err(err) => Err(err),
        };

        ctx.set_message_sent_in_current_transaction(message_sent);
        result
    }

    fn read_command(&self) -> ProbeCommand {
        ProbeCommand::find(self.namespace.clone(), self.projection_field.clone(), 1)
    }

    fn write_command(&self) -> ProbeCommand {
        ProbeCommand::update_one(
            self.namespace.clone(),
            Filter::missing(self.projection_field.clone()),
            WRITE_PROBE_FIELD,
            json!(1),
        )
    }
}

#[cfg(test)]
mod tests {
    use txnprobe_core::{SessionId, SessionOptions};
    use txnprobe_driver::backends::MemoryDriver;
    use txnprobe_driver::DriverError;

    use super::*;

    fn runner() -> ProbeRunner {
        ProbeRunner::new(Namespace::new("__txnprobe", "probe"), "_id")
    }

    fn ctx(driver: &MemoryDriver, number: i64) -> SessionContext<txnprobe_driver::backends::MemoryHandle> {
        let mut ctx = driver.create_session(SessionId::random(), &SessionOptions::transacted()).expect("session");
        ctx.advance_transaction_number(number);
        ctx
    }

    #[test]
    fn test_read_probe_starts_transaction_as_messaged() {
        let driver = MemoryDriver::new();
        let mut ctx = ctx(&driver, 1);

        let err = runner().probe_read(&driver, &mut ctx).expect_err("no such transaction");
        assert!(ctx.has_active_transaction());
        assert!(ctx.message_sent_in_current_transaction());
        assert_eq!(err.as_server_error().map(|e| e.code), Some(251));
        // The probe did not start a server transaction.
        assert_eq!(driver.transaction_of(ctx.id()).expect("state"), None);
    }

    #[test]
    fn test_read_probe_succeeds_in_active_transaction() {
        let driver = MemoryDriver::new();
        let mut ctx = ctx(&driver, 3);
        driver.begin_transaction(ctx.id(), 3).expect("begin");

        runner().probe_read(&driver, &mut ctx).expect("active");
        assert_eq!(driver.commands_executed(), 1);
    }

    #[test]
    fn test_read_probe_requires_number() {
        let driver = MemoryDriver::new();
        let mut ctx = ctx(&driver, 0);
        assert!(matches!(
            runner().probe_read(&driver, &mut ctx),
            Err(DriverError::SessionUnavailable(_))
        ));
        assert_eq!(driver.commands_executed(), 0);
    }

    #[test]
    fn test_write_probe_restores_flag() {
        let driver = MemoryDriver::new();
        let mut ctx = ctx(&driver, 2);
        driver.begin_transaction(ctx.id(), 2).expect("begin");

        runner().probe_write(&driver, &mut ctx).expect("active");
        assert!(ctx.has_active_transaction());
        assert!(!ctx.message_sent_in_current_transaction());
    }

    #[test]
    fn test_write_probe_restores_flag_on_error() {
        let driver = MemoryDriver::new();
        let mut ctx = ctx(&driver, 2);

        let err = runner().probe_write(&driver, &mut ctx).expect_err("no such transaction");
        assert_eq!(err.as_server_error().map(|e| e.code), Some(251));
        assert!(!ctx.message_sent_in_current_transaction());
    }

    #[test]
    fn test_probe_dispatch() {
        let driver = MemoryDriver::new();
        let mut ctx = ctx(&driver, 1);
        driver.begin_transaction(ctx.id(), 1).expect("begin");

        runner().probe(ProbeMode::Write, &driver, &mut ctx).expect("write probe");
        runner().probe(ProbeMode::Read, &driver, &mut ctx).expect("read probe");
        assert_eq!(driver.commands_executed(), 2);
    }
}
