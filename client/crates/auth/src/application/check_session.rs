//! Check Session Use Case
//!
//! Answers "who is signed in and what may they do". Nothing is cached:
//! every call derives its answer from the adapter and the user service.

use std::sync::Arc;

use crate::application::identity::IdentityProvider;
use crate::application::profile::ProfileResolver;
use crate::domain::entity::{Profile, Session};
use crate::domain::repository::{IdentityBackend, ProfileSource};
use crate::error::AuthResult;

/// Answers the questions an admin gate asks
#[trait_variant::make(RoleAuthority: Send)]
pub trait LocalRoleAuthority {
    /// Synchronous cache-then-confirm check
    fn is_authenticated_now(&self) -> bool;

    /// Whether the current identity holds the admin role
    async fn resolve_admin(&self) -> AuthResult<bool>;
}

pub struct SessionResolver<B, P>
where
    B: IdentityBackend,
    P: ProfileSource,
{
    identity: Arc<IdentityProvider<B>>,
    profiles: Arc<ProfileResolver<B, P>>,
}

impl<B, P> SessionResolver<B, P>
where
    B: IdentityBackend + Send + Sync + 'static,
    P: ProfileSource + Send + Sync + 'static,
{
    pub fn new(identity: Arc<IdentityProvider<B>>, profiles: Arc<ProfileResolver<B, P>>) -> Self {
        Self { identity, profiles }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_authenticated_now()
    }

    /// Admin check; any failure reads as "not admin"
    pub async fn is_admin(&self) -> bool {
        self.profiles.fetch_profile().await.is_admin()
    }

    pub async fn get_profile(&self) -> Profile {
        self.profiles.fetch_profile().await
    }

    /// Assemble the full session answer
    pub async fn session(&self) -> Session {
        self.session_with_profile().await.0
    }

    /// Session plus the profile its role was read from, in one sweep
    pub async fn session_with_profile(&self) -> (Session, Option<Profile>) {
        if !self.is_authenticated() {
            return (Session::anonymous(), None);
        }
        let token = self.identity.refresh_token().await;
        let profile = self.profiles.fetch_profile().await;
        let session = Session {
            authenticated: true,
            token,
            role: Some(profile.role),
        };
        (session, Some(profile))
    }
}

impl<B, P> RoleAuthority for SessionResolver<B, P>
where
    B: IdentityBackend + Send + Sync + 'static,
    P: ProfileSource + Send + Sync + 'static,
{
    fn is_authenticated_now(&self) -> bool {
        self.is_authenticated()
    }

    async fn resolve_admin(&self) -> AuthResult<bool> {
        Ok(self.is_admin().await)
    }
}
