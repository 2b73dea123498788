//! The transaction reconciler.

use std::sync::Arc;

use tracing::{debug, warn};
use txnprobe_core::{
    DecodeFault, Decoded, ErrorCodeDecoder, SessionId, SessionOptions, Transaction,
    TransactionState,
};
use txnprobe_driver::{Driver, DriverError, ServerError, SessionContext};

use super::locks::SessionLocks;
use crate::config::{ProbeMode, ReconcilerConfig};
use crate::error::{Error, Result};
use crate::metrics::ReconcileMetrics;
use crate::probe::ProbeRunner;
use crate::sessions::SessionOptionsProvider;

/// Determines the server-side state of a session's transaction.
///
/// The reconciler is constructed once with an explicitly owned driver and a
/// session-options provider, and shared by reference across calls. It keeps
/// no per-call state between calls; calls for the same session id are
/// serialized internally.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use txnprobe::{SessionRegistry, TransactionReconciler, TransactionState};
/// use txnprobe_driver::backends::MemoryDriver;
///
/// let registry = SessionRegistry::new();
/// let sid = registry.open(SessionOptions::transacted())?;
///
/// let reconciler = TransactionReconciler::new(Arc::new(MemoryDriver::new()), registry);
/// let txn = reconciler.reconcile(sid)?;
/// assert_eq!(txn.state(), TransactionState::None);
/// ```
pub struct TransactionReconciler<D: Driver, P: SessionOptionsProvider> {
    driver: Arc<D>,
    sessions: P,
    runner: ProbeRunner,
    decoder: ErrorCodeDecoder,
    mode: ProbeMode,
    locks: SessionLocks,
    metrics: ReconcileMetrics,
}

impl<D: Driver, P: SessionOptionsProvider> TransactionReconciler<D, P> {
    /// Create a reconciler with the default configuration.
    pub fn new(driver: Arc<D>, sessions: P) -> Self {
        Self::from_valid_config(driver, sessions, ReconcilerConfig::default())
    }

    /// Create a reconciler with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid.
    pub fn with_config(driver: Arc<D>, sessions: P, config: ReconcilerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(driver, sessions, config))
    }

    fn from_valid_config(driver: Arc<D>, sessions: P, config: ReconcilerConfig) -> Self {
        Self {
            driver,
            sessions,
            runner: ProbeRunner::new(config.namespace, config.projection_field),
            decoder: ErrorCodeDecoder::new(config.markers),
            mode: config.probe_mode,
            locks: SessionLocks::new(config.lock_stripes),
            metrics: ReconcileMetrics::new(),
        }
    }

    /// The driver probes are issued through.
    #[must_use]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// The session-options provider.
    #[must_use]
    pub const fn sessions(&self) -> &P {
        &self.sessions
    }

    /// The probe mode in use.
    #[must_use]
    pub const fn probe_mode(&self) -> ProbeMode {
        self.mode
    }

    /// Reconciliation metrics.
    #[must_use]
    pub const fn metrics(&self) -> &ReconcileMetrics {
        &self.metrics
    }

    /// Determine the transaction state of session `id`.
    ///
    /// Looks up the session's options, then proceeds as
    /// [`reconcile_with_options`](Self::reconcile_with_options).
    ///
    /// # Errors
    ///
    /// - [`Error::SessionNotFound`] if the provider does not know `id`
    /// - [`Error::DecodeFault`] if the server answered with an error that
    ///   cannot be classified
    /// - [`Error::Driver`] if the driver failed without a server answer
    pub fn reconcile(&self, id: SessionId) -> Result<Transaction> {
        let options = self.sessions.lookup(id).map_err(|err| {
            if err.is_session_not_found() {
                self.metrics.record_session_not_found();
            }
            err
        })?;
        self.reconcile_with_options(id, &options)
    }

    /// Determine the transaction state of session `id` opened with `options`.
    ///
    /// Sessions that do not use transactions resolve to
    /// [`Transaction::not_supporting`] without any server interaction.
    /// Otherwise a fresh session context is created for the call and released
    /// afterwards. A failed release is logged; it never replaces the outcome.
    ///
    /// # Errors
    ///
    /// See [`reconcile`](Self::reconcile).
    pub fn reconcile_with_options(
        &self,
        id: SessionId,
        options: &SessionOptions,
    ) -> Result<Transaction> {
        self.metrics.record_reconciliation();
        if !options.transacted {
            self.metrics.record_outcome(TransactionState::NotSupporting);
            return Ok(Transaction::not_supporting());
        }

        let _guard = self.locks.lock(id)?;
        let mut ctx = self.driver.create_session(id, options)?;
        let result = self.resolve(&mut ctx);
        if let Err(err) = self.driver.release_session(ctx) {
            warn!(session = %id, error = %err, "failed to release session");
        }
        result
    }

    /// Determine the transaction state of a caller-held session context.
    ///
    /// The context keeps whatever transaction number the call settled on, so
    /// it can be reused for later calls on the same session.
    ///
    /// # Errors
    ///
    /// See [`reconcile`](Self::reconcile).
    pub fn reconcile_context(&self, ctx: &mut SessionContext<D::Handle>) -> Result<Transaction> {
        self.metrics.record_reconciliation();
        let _guard = self.locks.lock(ctx.id())?;
        self.resolve(ctx)
    }

    fn resolve(&self, ctx: &mut SessionContext<D::Handle>) -> Result<Transaction> {
        if ctx.transaction_number() == 0 {
            ctx.advance_transaction_number(1);
        }
        let current = ctx.transaction_number();

        let (first, first_err) = match self.probe(ctx) {
            Ok(()) => return Ok(self.finish(Transaction::new(current, TransactionState::In))),
            Err(err) => self.decode(err)?,
        };

        if first.number <= current {
            let state = Self::require_state(first, &first_err).map_err(|fault| self.fault(fault))?;
            return Ok(self.finish(Transaction::new(first.number, state)));
        }

        debug!(
            session = %ctx.id(),
            from = current,
            to = first.number,
            namespace = %self.runner.namespace(),
            "server reports a newer transaction number, probing again"
        );
        ctx.advance_transaction_number(first.number);
        self.metrics.record_retry();

        let txn = match self.probe(ctx) {
            Ok(()) => Transaction::new(first.number, TransactionState::In),
            Err(err) => {
                let (second, second_err) = self.decode(err)?;
                let state =
                    Self::require_state(second, &second_err).map_err(|fault| self.fault(fault))?;
                Transaction::new(first.number, state)
            }
        };
        Ok(self.finish(txn))
    }

    fn probe(&self, ctx: &mut SessionContext<D::Handle>) -> std::result::Result<(), DriverError> {
        self.metrics.record_probe();
        self.runner.probe(self.mode, self.driver.as_ref(), ctx)
    }

    /// Decode a probe failure, keeping the server error for diagnostics.
    fn decode(&self, err: DriverError) -> Result<(Decoded, ServerError)> {
        match err {
            DriverError::Server(server) => match self.decoder.decode(server.code, &server.message) {
                Ok(decoded) => Ok((decoded, server)),
                Err(fault) => Err(self.fault(fault)),
            },
            other => Err(Error::Driver(other)),
        }
    }

    fn require_state(
        decoded: Decoded,
        server: &ServerError,
    ) -> std::result::Result<TransactionState, DecodeFault> {
        decoded.state.ok_or_else(|| {
            DecodeFault::new(server.code, server.message.clone(), "error does not determine a state")
        })
    }

    fn fault(&self, fault: DecodeFault) -> Error {
        warn!(
            code = fault.code,
            message = %fault.message,
            reason = %fault.reason,
            "unrecognized server error while probing transaction state"
        );
        self.metrics.record_decode_fault();
        Error::DecodeFault(fault)
    }

    fn finish(&self, txn: Transaction) -> Transaction {
        debug!(number = txn.number(), state = %txn.state(), "transaction reconciled");
        self.metrics.record_outcome(txn.state());
        txn
    }
}
