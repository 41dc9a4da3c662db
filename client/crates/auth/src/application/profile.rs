//! Profile Resolver
//!
//! Sweeps the configured profile endpoints in order and falls back to a
//! degraded profile, so callers always receive a [`Profile`].

use std::sync::Arc;

use platform::secret::SecretToken;

use crate::application::config::AuthConfig;
use crate::application::identity::IdentityProvider;
use crate::domain::entity::Profile;
use crate::domain::repository::{IdentityBackend, ProfileSource};
use crate::error::{AuthError, AuthResult};

/// Outcome of one discovery sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileLookup {
    Found(Profile),
    NotFound,
}

pub struct ProfileResolver<B, P>
where
    B: IdentityBackend,
    P: ProfileSource,
{
    identity: Arc<IdentityProvider<B>>,
    source: Arc<P>,
    config: Arc<AuthConfig>,
}

impl<B, P> ProfileResolver<B, P>
where
    B: IdentityBackend + Send + Sync + 'static,
    P: ProfileSource + Send + Sync + 'static,
{
    pub fn new(identity: Arc<IdentityProvider<B>>, source: Arc<P>, config: Arc<AuthConfig>) -> Self {
        Self {
            identity,
            source,
            config,
        }
    }

    /// Resolve the current profile; never fails
    pub async fn fetch_profile(&self) -> Profile {
        match self.try_fetch().await {
            Ok(ProfileLookup::Found(profile)) => profile,
            Ok(ProfileLookup::NotFound) => {
                tracing::error!("All profile endpoints failed, using fallback profile");
                self.fallback()
            }
            Err(e) => {
                e.log();
                self.fallback()
            }
        }
    }

    /// One sweep with the freshest token
    pub async fn try_fetch(&self) -> AuthResult<ProfileLookup> {
        let token = self
            .identity
            .refresh_token()
            .await
            .ok_or(AuthError::NotAuthenticated)?;
        Ok(self.discover(&token).await)
    }

    /// Try each candidate once; the first success wins
    pub async fn discover(&self, token: &SecretToken) -> ProfileLookup {
        for path in &self.config.profile_paths {
            let attempt = tokio::time::timeout(
                self.config.profile_request_timeout,
                self.source.fetch_profile_at(path, token),
            )
            .await;

            match attempt {
                Ok(Ok(profile)) => {
                    tracing::debug!(path = %path, role = %profile.role, "Profile endpoint answered");
                    return ProfileLookup::Found(profile);
                }
                Ok(Err(e)) => {
                    tracing::debug!(path = %path, error = %e, "Profile endpoint failed");
                }
                Err(_) => {
                    tracing::debug!(path = %path, "Profile endpoint timed out");
                }
            }
        }
        ProfileLookup::NotFound
    }

    fn fallback(&self) -> Profile {
        Profile::fallback(
            self.identity.credentials().email(),
            &self.config.fallback_full_name,
        )
    }
}
