//! Per-session lock striping.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, MutexGuard};

use txnprobe_core::SessionId;

use crate::error::{Error, Result};

/// Serializes work on the same session id.
///
/// Ids hash onto a fixed set of stripes, so unrelated sessions only contend
/// when they share a stripe.
#[derive(Debug)]
pub(crate) struct SessionLocks {
    stripes: Vec<Mutex<()>>,
}

impl SessionLocks {
    /// Create `stripes` locks. At least one stripe is always created.
    pub(crate) fn new(stripes: usize) -> Self {
        Self { stripes: (0..stripes.max(1)).map(|_| Mutex::new(())).collect() }
    }

    /// Lock the stripe owning `id`.
    pub(crate) fn lock(&self, id: SessionId) -> Result<MutexGuard<'_, ()>> {
        self.stripes[self.stripe_of(id)]
            .lock()
            .map_err(|e| Error::lock_poisoned(format!("session stripe: {e}")))
    }

    fn stripe_of(&self, id: SessionId) -> usize {
        let mut hasher = DefaultHasher::new();
        id.hash(&mut hasher);
        (hasher.finish() % self.stripes.len() as u64) as usize
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.stripes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_id_same_stripe() {
        let locks = SessionLocks::new(16);
        let id = SessionId::random();
        assert_eq!(locks.stripe_of(id), locks.stripe_of(id));
        assert!(locks.stripe_of(id) < locks.len());
    }

    #[test]
    fn test_zero_stripes_clamped() {
        let locks = SessionLocks::new(0);
        assert_eq!(locks.len(), 1);
        let _guard = locks.lock(SessionId::random()).expect("lock");
    }

    #[test]
    fn test_lock_is_released_on_drop() {
        let locks = SessionLocks::new(1);
        let id = SessionId::random();
        drop(locks.lock(id).expect("first"));
        let _guard = locks.lock(id).expect("second");
    }
}
