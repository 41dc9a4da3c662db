//! Session Monitor
//!
//! Long-lived view of the session for UI chrome (navigation bar, status
//! line). Drives a [`SessionTracker`] from identity events and resolves the
//! role after every sign-in, publishing each phase through a watch channel.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};

use crate::application::check_session::SessionResolver;
use crate::application::identity::IdentityProvider;
use crate::application::notifier::SubscriptionHandle;
use crate::domain::entity::{SessionPhase, SessionTracker};
use crate::domain::repository::{IdentityBackend, ProfileSource};

pub struct SessionMonitor {
    phase: watch::Receiver<SessionPhase>,
    subscription: SubscriptionHandle,
    listener: JoinHandle<()>,
}

impl SessionMonitor {
    /// Start monitoring; must be called within a tokio runtime
    pub fn spawn<B, P>(
        identity: Arc<IdentityProvider<B>>,
        sessions: Arc<SessionResolver<B, P>>,
    ) -> Self
    where
        B: IdentityBackend + Send + Sync + 'static,
        P: ProfileSource + Send + Sync + 'static,
    {
        let mut tracker = SessionTracker::new();
        let mut subscription = identity.subscribe();
        let handle = subscription.handle();

        tracker.begin_check();
        tracker.settle_snapshot(identity.is_authenticated_now());
        let (tx, rx) = watch::channel(tracker.phase().clone());

        let listener = tokio::spawn(async move {
            // Role lookups run beside the event loop; any newer event aborts them
            let mut lookups = JoinSet::new();
            loop {
                tokio::select! {
                    event = subscription.recv() => {
                        let Some(event) = event else { break };
                        if !tracker.apply_event(&event) {
                            tracing::debug!(seq = event.seq, "Stale identity event discarded");
                            continue;
                        }
                        lookups.abort_all();
                        tx.send_replace(tracker.phase().clone());

                        if event.is_signed_in() {
                            let sessions = Arc::clone(&sessions);
                            let seq = event.seq;
                            lookups.spawn(async move { (seq, sessions.get_profile().await.role) });
                        }
                    }
                    Some(Ok((seq, role))) = lookups.join_next() => {
                        if tracker.resolve_role(seq, role) {
                            tx.send_replace(tracker.phase().clone());
                        }
                    }
                }
            }
        });

        Self {
            phase: rx,
            subscription: handle,
            listener,
        }
    }

    /// Current phase
    pub fn phase(&self) -> SessionPhase {
        self.phase.borrow().clone()
    }

    /// Receiver that observes every published phase
    pub fn watch(&self) -> watch::Receiver<SessionPhase> {
        self.phase.clone()
    }

    /// Wait until `predicate` holds for the published phase
    pub async fn wait_for<F>(&self, predicate: F) -> SessionPhase
    where
        F: FnMut(&SessionPhase) -> bool,
    {
        let mut rx = self.phase.clone();
        let phase = match rx.wait_for(predicate).await {
            Ok(phase) => phase.clone(),
            Err(_) => self.phase(),
        };
        phase
    }

    pub fn stop(self) {}
}

impl Drop for SessionMonitor {
    fn drop(&mut self) {
        self.subscription.cancel();
        self.listener.abort();
    }
}
