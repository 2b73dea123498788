//! Session identifiers.
//!
//! A [`SessionId`] is an opaque v4 UUID. Ids issued through
//! [`SessionId::generate`] also carry the session's options in the low bits of
//! their last byte, so the options can be recovered from the id alone.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::SessionOptions;

const CAUSALLY_CONSISTENT_BIT: u8 = 0b01;
const TRANSACTED_BIT: u8 = 0b10;
const OPTION_BITS: u8 = CAUSALLY_CONSISTENT_BIT | TRANSACTED_BIT;

/// Opaque identifier of a client session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Wrap an existing UUID.
    #[must_use]
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Create a random session id.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a random session id with `options` stamped into it.
    #[must_use]
    pub fn generate(options: SessionOptions) -> Self {
        let mut bytes = *Uuid::new_v4().as_bytes();
        let mut bits = 0;
        if options.causally_consistent {
            bits |= CAUSALLY_CONSISTENT_BIT;
        }
        if options.transacted {
            bits |= TRANSACTED_BIT;
        }
        bytes[15] = (bytes[15] & !OPTION_BITS) | bits;
        Self(Uuid::from_bytes(bytes))
    }

    /// Read the options stamped by [`SessionId::generate`].
    ///
    /// Any id yields some options; only ids issued by `generate` yield
    /// meaningful ones.
    #[must_use]
    pub fn embedded_options(&self) -> SessionOptions {
        let last = self.0.as_bytes()[15];
        SessionOptions::new(last & CAUSALLY_CONSISTENT_BIT != 0, last & TRANSACTED_BIT != 0)
    }

    /// Get the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for SessionId {
    fn from(id: Uuid) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
