//! Sign In Use Case
//!
//! Authenticates with the identity provider and stores the credential.

use std::sync::Arc;

use platform::secret::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::application::identity::IdentityProvider;
use crate::domain::repository::IdentityBackend;
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInOutput {
    /// Email the credential was stored under
    pub email: String,
    /// Route to navigate to next
    pub redirect_to: String,
}

/// Sign in use case
pub struct SignInUseCase<B>
where
    B: IdentityBackend,
{
    identity: Arc<IdentityProvider<B>>,
    config: Arc<AuthConfig>,
}

impl<B> SignInUseCase<B>
where
    B: IdentityBackend + Send + Sync + 'static,
{
    pub fn new(identity: Arc<IdentityProvider<B>>, config: Arc<AuthConfig>) -> Self {
        Self { identity, config }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let password =
            ClearTextPassword::for_sign_in(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        let credential = self
            .identity
            .sign_in(&input.email, &password)
            .await
            .inspect_err(|e| e.log())?;

        Ok(SignInOutput {
            email: credential.email,
            redirect_to: self.config.home_route.clone(),
        })
    }
}
