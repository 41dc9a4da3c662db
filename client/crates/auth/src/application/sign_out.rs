//! Sign Out Use Case

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::identity::IdentityProvider;
use crate::domain::repository::IdentityBackend;

/// Sign out output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignOutOutput {
    pub redirect_to: String,
}

/// Sign out use case
///
/// Always succeeds locally; provider failures are only logged.
pub struct SignOutUseCase<B>
where
    B: IdentityBackend,
{
    identity: Arc<IdentityProvider<B>>,
    config: Arc<AuthConfig>,
}

impl<B> SignOutUseCase<B>
where
    B: IdentityBackend + Send + Sync + 'static,
{
    pub fn new(identity: Arc<IdentityProvider<B>>, config: Arc<AuthConfig>) -> Self {
        Self { identity, config }
    }

    pub async fn execute(&self) -> SignOutOutput {
        self.identity.sign_out().await;
        SignOutOutput {
            redirect_to: self.config.login_route.clone(),
        }
    }
}
