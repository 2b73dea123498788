//! Session-options providers.
//!
//! The reconciler learns how a session was opened from a
//! [`SessionOptionsProvider`]. Two providers ship with the crate:
//!
//! - [`SessionRegistry`] - an in-memory map filled by whoever opens sessions
//! - [`EmbeddedOptions`] - reads the options stamped into ids issued by
//!   [`SessionId::generate`]

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use txnprobe_core::{SessionId, SessionOptions};

use crate::error::{Error, Result};

/// Looks up the options a session was opened with.
pub trait SessionOptionsProvider: Send + Sync {
    /// Look up the options of session `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionNotFound`] if the id is unknown.
    fn lookup(&self, id: SessionId) -> Result<SessionOptions>;
}

impl<P: SessionOptionsProvider + ?Sized> SessionOptionsProvider for Arc<P> {
    fn lookup(&self, id: SessionId) -> Result<SessionOptions> {
        (**self).lookup(id)
    }
}

/// An in-memory session-options registry.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, SessionOptions>>,
}

impl SessionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the options of session `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockPoisoned`] if the registry lock is poisoned.
    pub fn register(&self, id: SessionId, options: SessionOptions) -> Result<()> {
        self.sessions
            .write()
            .map_err(|e| Error::lock_poisoned(e.to_string()))?
            .insert(id, options);
        Ok(())
    }

    /// Open a new session: generate an id carrying `options` and register it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockPoisoned`] if the registry lock is poisoned.
    pub fn open(&self, options: SessionOptions) -> Result<SessionId> {
        let id = SessionId::generate(options);
        self.register(id, options)?;
        Ok(id)
    }

    /// Forget session `id`, returning its options if it was registered.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockPoisoned`] if the registry lock is poisoned.
    pub fn remove(&self, id: SessionId) -> Result<Option<SessionOptions>> {
        Ok(self.sessions.write().map_err(|e| Error::lock_poisoned(e.to_string()))?.remove(&id))
    }

    /// Number of registered sessions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockPoisoned`] if the registry lock is poisoned.
    pub fn len(&self) -> Result<usize> {
        Ok(self.sessions.read().map_err(|e| Error::lock_poisoned(e.to_string()))?.len())
    }

    /// Returns `true` if no session is registered.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockPoisoned`] if the registry lock is poisoned.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl SessionOptionsProvider for SessionRegistry {
    fn lookup(&self, id: SessionId) -> Result<SessionOptions> {
        self.sessions
            .read()
            .map_err(|e| Error::lock_poisoned(e.to_string()))?
            .get(&id)
            .copied()
            .ok_or(Error::SessionNotFound(id))
    }
}

/// Reads the options stamped into the session id itself.
///
/// Every id resolves, so this provider never reports an unknown session.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedOptions;

impl SessionOptionsProvider for EmbeddedOptions {
    fn lookup(&self, id: SessionId) -> Result<SessionOptions> {
        Ok(id.embedded_options())
    }
}
