//! Identity Notifier
//!
//! Fan-out of sequenced identity events. Each subscriber owns an unbounded
//! channel; sequence numbers are assigned under the registry lock, so every
//! subscriber observes them in increasing order.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use kernel::id::SubscriptionId;
use tokio::sync::mpsc;

use crate::domain::entity::{Identity, IdentityEvent};

#[derive(Default)]
struct Registry {
    last_seq: u64,
    subscribers: HashMap<SubscriptionId, mpsc::UnboundedSender<IdentityEvent>>,
}

impl Registry {
    fn next_seq(&mut self) -> u64 {
        self.last_seq += 1;
        self.last_seq
    }
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    // Registry updates never leave it half-written
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Publisher side, owned by the identity adapter
#[derive(Default)]
pub struct IdentityNotifier {
    registry: Arc<Mutex<Registry>>,
}

impl IdentityNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber and queue the current state as its first event
    ///
    /// `current` is evaluated under the registry lock, so a concurrent
    /// `publish` is ordered strictly before or after it.
    pub fn subscribe<F>(&self, current: F) -> Subscription
    where
        F: FnOnce() -> Option<Identity>,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = SubscriptionId::new();

        let mut registry = lock(&self.registry);
        let event = IdentityEvent {
            seq: registry.next_seq(),
            identity: current(),
        };
        // The receiver is still in scope, so this cannot fail
        let _ = tx.send(event);
        registry.subscribers.insert(id, tx);

        tracing::debug!(subscribers = registry.subscribers.len(), "Identity subscriber added");

        Subscription {
            handle: SubscriptionHandle {
                id,
                registry: Arc::downgrade(&self.registry),
            },
            rx,
        }
    }

    /// Deliver a transition to every live subscriber, returning its sequence
    pub fn publish(&self, identity: Option<Identity>) -> u64 {
        let mut registry = lock(&self.registry);
        let seq = registry.next_seq();
        registry.subscribers.retain(|_, tx| {
            tx.send(IdentityEvent {
                seq,
                identity: identity.clone(),
            })
            .is_ok()
        });
        tracing::debug!(
            seq,
            signed_in = identity.is_some(),
            subscribers = registry.subscribers.len(),
            "Identity event published"
        );
        seq
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.registry).subscribers.len()
    }

    pub fn last_seq(&self) -> u64 {
        lock(&self.registry).last_seq
    }
}

/// Detachable handle that can cancel a subscription from elsewhere
#[derive(Debug, Clone)]
pub struct SubscriptionHandle {
    id: SubscriptionId,
    registry: Weak<Mutex<Registry>>,
}

impl SubscriptionHandle {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Stop delivery; the receiver sees the end of the stream once drained
    pub fn cancel(&self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).subscribers.remove(&self.id);
        }
    }
}

/// Receiving side of one subscriber
///
/// Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    handle: SubscriptionHandle,
    rx: mpsc::UnboundedReceiver<IdentityEvent>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.handle.id
    }

    pub fn handle(&self) -> SubscriptionHandle {
        self.handle.clone()
    }

    /// Next event, or `None` once cancelled or the notifier is gone
    pub async fn recv(&mut self) -> Option<IdentityEvent> {
        self.rx.recv().await
    }

    /// Next event if one is already queued
    pub fn try_recv(&mut self) -> Option<IdentityEvent> {
        self.rx.try_recv().ok()
    }

    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.cancel();
    }
}
