//! Reconciler configuration.
//!
//! This module provides [`ReconcilerConfig`] and [`ReconcilerBuilder`] for
//! setting up a [`TransactionReconciler`].
//!
//! # Example
//!
//! ```ignore
//! use txnprobe::{ProbeMode, ReconcilerBuilder};
//!
//! let reconciler = ReconcilerBuilder::new()
//!     .namespace(Namespace::new("admin_probe", "probe"))
//!     .probe_mode(ProbeMode::Write)
//!     .build(driver, registry)?;
//! ```
//!
//! Configuration can also be read from JSON; missing fields take their
//! defaults:
//!
//! ```ignore
//! let config = ReconcilerConfig::from_json(r#"{ "probe_mode": "write" }"#)?;
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use txnprobe_core::MarkerTable;
use txnprobe_driver::{Driver, Namespace};

use crate::error::{Error, Result};
use crate::reconcile::TransactionReconciler;
use crate::sessions::SessionOptionsProvider;

/// Which command a probe issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeMode {
    /// A single-document read projected to one field.
    #[default]
    Read,
    /// An update whose filter matches no document.
    Write,
}

/// Configuration for a [`TransactionReconciler`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilerConfig {
    /// Reserved namespace probes run against.
    pub namespace: Namespace,
    /// Field projected by read probes and negated by write probe filters.
    pub projection_field: String,
    /// Which command a probe issues.
    pub probe_mode: ProbeMode,
    /// Marker table used to decode server errors.
    pub markers: MarkerTable,
    /// Number of per-session lock stripes.
    pub lock_stripes: usize,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            namespace: Namespace::new("__txnprobe", "probe"),
            projection_field: "_id".to_string(),
            probe_mode: ProbeMode::Read,
            markers: MarkerTable::default(),
            lock_stripes: 64,
        }
    }
}

impl ReconcilerConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the JSON is malformed or the resulting
    /// configuration is invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| Error::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the reconciler cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.lock_stripes == 0 {
            return Err(Error::config("lock_stripes must be greater than zero"));
        }
        if self.namespace.database.is_empty() || self.namespace.collection.is_empty() {
            return Err(Error::config("probe namespace must name a database and a collection"));
        }
        if self.projection_field.is_empty() {
            return Err(Error::config("projection_field must not be empty"));
        }
        Ok(())
    }
}

/// Builder for a [`TransactionReconciler`].
#[derive(Debug, Clone, Default)]
pub struct ReconcilerBuilder {
    config: ReconcilerConfig,
}

impl ReconcilerBuilder {
    /// Create a builder with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: ReconcilerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the probe namespace.
    #[must_use]
    pub fn namespace(mut self, namespace: Namespace) -> Self {
        self.config.namespace = namespace;
        self
    }

    /// Set the projected field.
    #[must_use]
    pub fn projection_field(mut self, field: impl Into<String>) -> Self {
        self.config.projection_field = field.into();
        self
    }

    /// Set the probe mode.
    #[must_use]
    pub const fn probe_mode(mut self, mode: ProbeMode) -> Self {
        self.config.probe_mode = mode;
        self
    }

    /// Set the marker table.
    #[must_use]
    pub fn markers(mut self, markers: MarkerTable) -> Self {
        self.config.markers = markers;
        self
    }

    /// Set the number of lock stripes.
    #[must_use]
    pub const fn lock_stripes(mut self, stripes: usize) -> Self {
        self.config.lock_stripes = stripes;
        self
    }

    /// Build the reconciler.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid.
    pub fn build<D, P>(self, driver: Arc<D>, sessions: P) -> Result<TransactionReconciler<D, P>>
    where
        D: Driver,
        P: SessionOptionsProvider,
    {
        TransactionReconciler::with_config(driver, sessions, self.config)
    }
}
