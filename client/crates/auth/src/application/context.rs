//! Session Context
//!
//! Explicitly constructed bundle of the session services for one origin.
//! Everything that needs to ask about the session receives this (or one of
//! its `Arc`s) instead of reaching for a global.

use std::sync::Arc;

use platform::storage::SharedStore;

use crate::application::check_session::SessionResolver;
use crate::application::config::AuthConfig;
use crate::application::credential_store::CredentialStore;
use crate::application::identity::IdentityProvider;
use crate::application::profile::ProfileResolver;
use crate::application::session_monitor::SessionMonitor;
use crate::domain::repository::{IdentityBackend, ProfileSource};

pub struct SessionContext<B, P>
where
    B: IdentityBackend,
    P: ProfileSource,
{
    pub config: Arc<AuthConfig>,
    pub identity: Arc<IdentityProvider<B>>,
    pub profiles: Arc<ProfileResolver<B, P>>,
    pub sessions: Arc<SessionResolver<B, P>>,
    /// User service adapter, shared with registration
    pub source: Arc<P>,
}

impl<B, P> SessionContext<B, P>
where
    B: IdentityBackend + Send + Sync + 'static,
    P: ProfileSource + Send + Sync + 'static,
{
    pub fn new(config: AuthConfig, store: SharedStore, backend: Arc<B>, source: Arc<P>) -> Self {
        let config = Arc::new(config);
        let credentials = CredentialStore::new(store, &config);
        let identity = Arc::new(IdentityProvider::new(backend, credentials));
        let profiles = Arc::new(ProfileResolver::new(
            Arc::clone(&identity),
            Arc::clone(&source),
            Arc::clone(&config),
        ));
        let sessions = Arc::new(SessionResolver::new(
            Arc::clone(&identity),
            Arc::clone(&profiles),
        ));

        Self {
            config,
            identity,
            profiles,
            sessions,
            source,
        }
    }

    pub fn credentials(&self) -> &CredentialStore {
        self.identity.credentials()
    }

    /// Start a [`SessionMonitor`] bound to this context
    pub fn monitor(&self) -> SessionMonitor {
        SessionMonitor::spawn(Arc::clone(&self.identity), Arc::clone(&self.sessions))
    }
}

impl<B, P> Clone for SessionContext<B, P>
where
    B: IdentityBackend,
    P: ProfileSource,
{
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            identity: Arc::clone(&self.identity),
            profiles: Arc::clone(&self.profiles),
            sessions: Arc::clone(&self.sessions),
            source: Arc::clone(&self.source),
        }
    }
}
