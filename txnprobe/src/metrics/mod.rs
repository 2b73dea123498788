//! Metrics for transaction reconciliation.
//!
//! Counters are kept in atomics for cheap snapshots and mirrored to the
//! [`metrics`] crate facade, so an installed recorder (for example
//! `metrics-exporter-prometheus`) exports them without further wiring.
//!
//! # Example
//!
//! ```ignore
//! let txn = reconciler.reconcile(sid)?;
//!
//! let snapshot = reconciler.metrics().snapshot();
//! println!("probes issued: {}", snapshot.probes);
//! println!("decode faults: {}", snapshot.decode_faults);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use txnprobe_core::TransactionState;

// Re-export the metrics crate for integration
pub use ::metrics;

const STATES: [TransactionState; 5] = [
    TransactionState::NotSupporting,
    TransactionState::In,
    TransactionState::Aborted,
    TransactionState::Committed,
    TransactionState::None,
];

const fn state_index(state: TransactionState) -> usize {
    match state {
        TransactionState::NotSupporting => 0,
        TransactionState::In => 1,
        TransactionState::Aborted => 2,
        TransactionState::Committed => 3,
        TransactionState::None => 4,
    }
}

/// Reconciliation counters.
///
/// Thread-safe; shared by every call on one reconciler.
#[derive(Debug)]
pub struct ReconcileMetrics {
    reconciliations: AtomicU64,
    probes: AtomicU64,
    retries: AtomicU64,
    decode_faults: AtomicU64,
    sessions_not_found: AtomicU64,
    outcomes: [AtomicU64; 5],
}

impl ReconcileMetrics {
    /// Create a zeroed metrics instance.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reconciliations: AtomicU64::new(0),
            probes: AtomicU64::new(0),
            retries: AtomicU64::new(0),
            decode_faults: AtomicU64::new(0),
            sessions_not_found: AtomicU64::new(0),
            outcomes: [
                AtomicU64::new(0),
                AtomicU64::new(0),
                AtomicU64::new(0),
                AtomicU64::new(0),
                AtomicU64::new(0),
            ],
        }
    }

    /// Record the start of a reconciliation.
    pub fn record_reconciliation(&self) {
        self.reconciliations.fetch_add(1, Ordering::Relaxed);
        ::metrics::counter!("txnprobe_reconciliations_total").increment(1);
    }

    /// Record an issued probe.
    pub fn record_probe(&self) {
        self.probes.fetch_add(1, Ordering::Relaxed);
        ::metrics::counter!("txnprobe_probes_total").increment(1);
    }

    /// Record a retry at a corrected transaction number.
    pub fn record_retry(&self) {
        self.retries.fetch_add(1, Ordering::Relaxed);
        ::metrics::counter!("txnprobe_retries_total").increment(1);
    }

    /// Record a server error the decoder could not classify.
    pub fn record_decode_fault(&self) {
        self.decode_faults.fetch_add(1, Ordering::Relaxed);
        ::metrics::counter!("txnprobe_decode_faults_total").increment(1);
    }

    /// Record a lookup of an unknown session id.
    pub fn record_session_not_found(&self) {
        self.sessions_not_found.fetch_add(1, Ordering::Relaxed);
        ::metrics::counter!("txnprobe_sessions_not_found_total").increment(1);
    }

    /// Record the terminal state of a reconciliation.
    pub fn record_outcome(&self, state: TransactionState) {
        self.outcomes[state_index(state)].fetch_add(1, Ordering::Relaxed);
        ::metrics::counter!("txnprobe_outcomes_total", "state" => state.as_str()).increment(1);
    }

    /// Get a point-in-time snapshot of all counters.
    #[must_use]
    pub fn snapshot(&self) -> ReconcileMetricsSnapshot {
        ReconcileMetricsSnapshot {
            reconciliations: self.reconciliations.load(Ordering::Relaxed),
            probes: self.probes.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            decode_faults: self.decode_faults.load(Ordering::Relaxed),
            sessions_not_found: self.sessions_not_found.load(Ordering::Relaxed),
            outcomes: STATES.map(|state| (state, self.outcomes[state_index(state)].load(Ordering::Relaxed))),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.reconciliations.store(0, Ordering::Relaxed);
        self.probes.store(0, Ordering::Relaxed);
        self.retries.store(0, Ordering::Relaxed);
        self.decode_faults.store(0, Ordering::Relaxed);
        self.sessions_not_found.store(0, Ordering::Relaxed);
        for outcome in &self.outcomes {
            outcome.store(0, Ordering::Relaxed);
        }
    }
}

impl Default for ReconcileMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of [`ReconcileMetrics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileMetricsSnapshot {
    /// Reconciliations started.
    pub reconciliations: u64,
    /// Probes issued.
    pub probes: u64,
    /// Retries at a corrected transaction number.
    pub retries: u64,
    /// Server errors that could not be classified.
    pub decode_faults: u64,
    /// Lookups of unknown session ids.
    pub sessions_not_found: u64,
    /// Terminal states reached, per state.
    pub outcomes: [(TransactionState, u64); 5],
}

impl ReconcileMetricsSnapshot {
    /// How many reconciliations ended in `state`.
    #[must_use]
    pub fn outcome(&self, state: TransactionState) -> u64 {
        self.outcomes[state_index(state)].1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let metrics = ReconcileMetrics::new();
        metrics.record_reconciliation();
        metrics.record_probe();
        metrics.record_probe();
        metrics.record_retry();
        metrics.record_outcome(TransactionState::Committed);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.reconciliations, 1);
        assert_eq!(snapshot.probes, 2);
        assert_eq!(snapshot.retries, 1);
        assert_eq!(snapshot.outcome(TransactionState::Committed), 1);
        assert_eq!(snapshot.outcome(TransactionState::In), 0);
    }

    #[test]
    fn test_reset() {
        let metrics = ReconcileMetrics::new();
        metrics.record_decode_fault();
        metrics.record_session_not_found();
        metrics.record_outcome(TransactionState::None);
        metrics.reset();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.decode_faults, 0);
        assert_eq!(snapshot.sessions_not_found, 0);
        assert_eq!(snapshot.outcome(TransactionState::None), 0);
    }

    #[test]
    fn test_outcome_order_matches_states() {
        let snapshot = ReconcileMetrics::new().snapshot();
        let states: Vec<_> = snapshot.outcomes.iter().map(|(state, _)| *state).collect();
        assert_eq!(states, STATES.to_vec());
    }
}
