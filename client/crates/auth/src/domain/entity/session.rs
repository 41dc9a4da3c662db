//! Session Entity
//!
//! [`Session`] is a point-in-time answer derived on every check.
//! [`SessionTracker`] is the long-lived state machine a view keeps while it
//! listens to identity events:
//!
//! ```text
//! Unknown -> Checking -> Authenticated(role?) <-> Anonymous
//! ```

use platform::secret::SecretToken;

use crate::domain::entity::identity::IdentityEvent;
use crate::domain::value_object::Role;

/// Derived session, never cached
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub authenticated: bool,
    pub token: Option<SecretToken>,
    /// Resolved only when authenticated
    pub role: Option<Role>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role.is_some_and(|role| role.is_admin())
    }
}

/// Observable session state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Unknown,
    Checking,
    Authenticated {
        role: Option<Role>,
    },
    Anonymous,
}

impl SessionPhase {
    /// Whether a concrete answer is available
    #[inline]
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            SessionPhase::Authenticated { .. } | SessionPhase::Anonymous
        )
    }

    #[inline]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionPhase::Authenticated { .. })
    }

    #[inline]
    pub fn role(&self) -> Option<Role> {
        match self {
            SessionPhase::Authenticated { role } => *role,
            _ => None,
        }
    }
}

/// Applies snapshots, identity events and role resolutions in order
#[derive(Debug, Default)]
pub struct SessionTracker {
    phase: SessionPhase,
    applied_seq: Option<u64>,
    uid: Option<String>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    /// Sequence number of the last applied event
    pub fn applied_seq(&self) -> Option<u64> {
        self.applied_seq
    }

    /// `Unknown -> Checking`; no effect in any other phase
    pub fn begin_check(&mut self) {
        if self.phase == SessionPhase::Unknown {
            self.phase = SessionPhase::Checking;
        }
    }

    /// Apply the synchronous cache check
    ///
    /// Ignored once any event has been applied: events are authoritative.
    pub fn settle_snapshot(&mut self, authenticated: bool) -> bool {
        if self.applied_seq.is_some() {
            return false;
        }
        self.phase = if authenticated {
            SessionPhase::Authenticated {
                role: self.phase.role(),
            }
        } else {
            SessionPhase::Anonymous
        };
        true
    }

    /// Apply an identity event, returning `false` if it was stale
    pub fn apply_event(&mut self, event: &IdentityEvent) -> bool {
        if !event.is_newer_than(self.applied_seq) {
            return false;
        }
        self.applied_seq = Some(event.seq);

        match &event.identity {
            Some(identity) => {
                // Keep a resolved role only for the same account
                let same_account = self.uid.as_deref() == Some(identity.uid.as_str());
                let role = if same_account { self.phase.role() } else { None };
                self.uid = Some(identity.uid.clone());
                self.phase = SessionPhase::Authenticated { role };
            }
            None => {
                self.uid = None;
                self.phase = SessionPhase::Anonymous;
            }
        }
        true
    }

    /// Record a resolved role for the event it was resolved for
    ///
    /// Dropped if a newer event has been applied since, or if the session is
    /// no longer authenticated.
    pub fn resolve_role(&mut self, for_seq: u64, role: Role) -> bool {
        if self.applied_seq != Some(for_seq) || !self.phase.is_authenticated() {
            return false;
        }
        self.phase = SessionPhase::Authenticated { role: Some(role) };
        true
    }
}
