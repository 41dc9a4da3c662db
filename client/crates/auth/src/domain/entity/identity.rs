//! Identity Entity
//!
//! An identity is the provider's handle on a signed-in account. Changes to it
//! are delivered as sequenced [`IdentityEvent`]s.

/// Signed-in account as seen by the identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Provider-assigned user id
    pub uid: String,
    pub email: Option<String>,
}

impl Identity {
    pub fn new(uid: impl Into<String>, email: Option<String>) -> Self {
        Self {
            uid: uid.into(),
            email,
        }
    }
}

/// Identity transition delivered to subscribers
///
/// `seq` strictly increases per adapter. A consumer that remembers the
/// highest `seq` it applied can drop anything older.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityEvent {
    pub seq: u64,
    pub identity: Option<Identity>,
}

impl IdentityEvent {
    #[inline]
    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }

    /// Whether this event supersedes the last applied sequence number
    #[inline]
    pub fn is_newer_than(&self, applied: Option<u64>) -> bool {
        applied.is_none_or(|seq| self.seq > seq)
    }
}
