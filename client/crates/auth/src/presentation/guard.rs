//! Authorization Gates
//!
//! A gate decides whether a view may render. Decisions start `Pending` and
//! settle on `Allow` or a redirect; they are published through a watch
//! channel so a view can re-render whenever the answer changes.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::application::check_session::RoleAuthority;
use crate::application::config::AuthConfig;
use crate::application::identity::IdentityProvider;
use crate::application::notifier::SubscriptionHandle;
use crate::domain::entity::IdentityEvent;
use crate::domain::repository::IdentityBackend;

pub use crate::presentation::gate::{Gate, GateDecision};

#[derive(Debug, Clone)]
struct GateState {
    decision: GateDecision,
    applied_seq: Option<u64>,
}

impl GateState {
    fn pending() -> Self {
        Self {
            decision: GateDecision::Pending,
            applied_seq: None,
        }
    }
}

async fn wait_settled(state: &watch::Sender<GateState>) -> GateDecision {
    let mut rx = state.subscribe();
    let decision = match rx.wait_for(|s| !s.decision.is_pending()).await {
        Ok(s) => s.decision.clone(),
        Err(_) => GateDecision::Pending,
    };
    decision
}

// ============================================================================
// RequireAuthenticated
// ============================================================================

/// Gate for views that need a signed-in user
///
/// Listens to identity events for as long as it is mounted. Events are
/// authoritative; the synchronous snapshot taken at mount only counts until
/// the first event arrives.
pub struct RequireAuthenticated {
    state: Arc<watch::Sender<GateState>>,
    login_route: String,
    subscription: SubscriptionHandle,
    listener: JoinHandle<()>,
}

impl RequireAuthenticated {
    /// Mount the gate; must be called within a tokio runtime
    pub fn mount<B>(identity: &IdentityProvider<B>, config: &AuthConfig) -> Self
    where
        B: IdentityBackend + Send + Sync + 'static,
    {
        let (tx, _) = watch::channel(GateState::pending());
        let state = Arc::new(tx);
        let login_route = config.login_route.clone();

        let mut subscription = identity.subscribe();
        let handle = subscription.handle();

        apply_snapshot(&state, identity.is_authenticated_now(), &login_route);

        let listener = tokio::spawn({
            let state = Arc::clone(&state);
            let login_route = login_route.clone();
            async move {
                while let Some(event) = subscription.recv().await {
                    apply_event(&state, &event, &login_route);
                }
            }
        });

        Self {
            state,
            login_route,
            subscription: handle,
            listener,
        }
    }

    /// Apply an identity event directly; returns `false` if it was stale
    pub fn apply(&self, event: &IdentityEvent) -> bool {
        apply_event(&self.state, event, &self.login_route)
    }

    /// Wait until at least one identity event has been applied
    pub async fn confirmed(&self) -> GateDecision {
        let mut rx = self.state.subscribe();
        let decision = match rx.wait_for(|s| s.applied_seq.is_some()).await {
            Ok(s) => s.decision.clone(),
            Err(_) => GateDecision::Pending,
        };
        decision
    }

    /// Wait until the decision satisfies `predicate`
    pub async fn wait_for<F>(&self, mut predicate: F) -> GateDecision
    where
        F: FnMut(&GateDecision) -> bool,
    {
        let mut rx = self.state.subscribe();
        let decision = match rx.wait_for(|s| predicate(&s.decision)).await {
            Ok(s) => s.decision.clone(),
            Err(_) => self.decision(),
        };
        decision
    }

    /// Sequence number of the last applied event
    pub fn applied_seq(&self) -> Option<u64> {
        self.state.borrow().applied_seq
    }

    /// Stop listening and release the subscription
    pub fn unmount(self) {}
}

impl Drop for RequireAuthenticated {
    fn drop(&mut self) {
        self.subscription.cancel();
        self.listener.abort();
    }
}

impl Gate for RequireAuthenticated {
    fn decision(&self) -> GateDecision {
        self.state.borrow().decision.clone()
    }

    async fn settled(&self) -> GateDecision {
        wait_settled(&self.state).await
    }
}

fn authenticated_decision(authenticated: bool, login_route: &str) -> GateDecision {
    if authenticated {
        GateDecision::Allow
    } else {
        GateDecision::Redirect(login_route.to_string())
    }
}

fn apply_snapshot(state: &watch::Sender<GateState>, authenticated: bool, login_route: &str) {
    state.send_if_modified(|s| {
        if s.applied_seq.is_some() {
            return false;
        }
        let decision = authenticated_decision(authenticated, login_route);
        let changed = s.decision != decision;
        s.decision = decision;
        changed
    });
}

fn apply_event(state: &watch::Sender<GateState>, event: &IdentityEvent, login_route: &str) -> bool {
    let mut applied = false;
    state.send_if_modified(|s| {
        if !event.is_newer_than(s.applied_seq) {
            tracing::debug!(seq = event.seq, "Stale identity event discarded");
            return false;
        }
        applied = true;
        s.applied_seq = Some(event.seq);
        s.decision = authenticated_decision(event.is_signed_in(), login_route);
        true
    });
    applied
}

// ============================================================================
// RequireAdmin
// ============================================================================

/// Gate for admin-only views
///
/// Unauthenticated users go to the login route without any role lookup.
/// Everyone else who cannot be confirmed as admin, including on lookup
/// failure or timeout, goes home.
pub struct RequireAdmin {
    state: Arc<watch::Sender<GateState>>,
    evaluation: Option<JoinHandle<()>>,
}

impl Default for RequireAdmin {
    fn default() -> Self {
        Self::new()
    }
}

impl RequireAdmin {
    /// Gate with no evaluation started
    pub fn new() -> Self {
        let (tx, _) = watch::channel(GateState::pending());
        Self {
            state: Arc::new(tx),
            evaluation: None,
        }
    }

    /// Mount the gate and evaluate in the background
    pub fn mount<A>(authority: Arc<A>, config: Arc<AuthConfig>) -> Self
    where
        A: RoleAuthority + Send + Sync + 'static,
    {
        let mut gate = Self::new();
        let state = Arc::clone(&gate.state);
        gate.evaluation = Some(tokio::spawn(async move {
            let decision = admin_decision(authority.as_ref(), &config).await;
            publish(&state, decision);
        }));
        gate
    }

    /// Evaluate in the caller's task
    pub async fn evaluate<A>(&self, authority: &A, config: &AuthConfig) -> GateDecision
    where
        A: RoleAuthority + Sync,
    {
        let decision = admin_decision(authority, config).await;
        publish(&self.state, decision.clone());
        decision
    }

    pub fn unmount(self) {}
}

impl Drop for RequireAdmin {
    fn drop(&mut self) {
        if let Some(evaluation) = self.evaluation.take() {
            evaluation.abort();
        }
    }
}

impl Gate for RequireAdmin {
    fn decision(&self) -> GateDecision {
        self.state.borrow().decision.clone()
    }

    async fn settled(&self) -> GateDecision {
        wait_settled(&self.state).await
    }
}

fn publish(state: &watch::Sender<GateState>, decision: GateDecision) {
    state.send_modify(|s| s.decision = decision);
}

async fn admin_decision<A>(authority: &A, config: &AuthConfig) -> GateDecision
where
    A: RoleAuthority + Sync,
{
    if !authority.is_authenticated_now() {
        tracing::info!("Admin route requested without a session");
        return GateDecision::Redirect(config.login_route.clone());
    }

    match tokio::time::timeout(config.role_check_timeout, authority.resolve_admin()).await {
        Ok(Ok(true)) => GateDecision::Allow,
        Ok(Ok(false)) => {
            tracing::info!("Admin route requested by a non-admin user");
            GateDecision::Redirect(config.home_route.clone())
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Role check failed, denying admin access");
            GateDecision::Redirect(config.home_route.clone())
        }
        Err(_) => {
            tracing::warn!("Role check timed out, denying admin access");
            GateDecision::Redirect(config.home_route.clone())
        }
    }
}
