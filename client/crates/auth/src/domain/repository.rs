//! Repository Traits
//!
//! Ports to the identity provider and the user service. Implementations are
//! in the infrastructure layer.

use platform::secret::{ClearTextPassword, SecretToken};

use crate::domain::entity::{Identity, Profile, Registration, RegistrationReceipt};
use crate::domain::value_object::Email;
use crate::error::AuthResult;

/// Identity provider backend
#[trait_variant::make(IdentityBackend: Send)]
pub trait LocalIdentityBackend {
    /// Exchange email and password for a signed-in identity
    ///
    /// A rejected pair is `AuthError::InvalidCredentials`.
    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &ClearTextPassword,
    ) -> AuthResult<Identity>;

    /// End the provider session
    async fn sign_out(&self) -> AuthResult<()>;

    /// Synchronous snapshot of the signed-in identity
    fn current_user(&self) -> Option<Identity>;

    /// ID token for `identity`, refreshed when `force_refresh` is set or the
    /// cached one is about to expire
    async fn id_token(&self, identity: &Identity, force_refresh: bool) -> AuthResult<SecretToken>;
}

/// User service profile endpoint
#[trait_variant::make(ProfileSource: Send)]
pub trait LocalProfileSource {
    /// Fetch the profile from one candidate path
    async fn fetch_profile_at(&self, path: &str, token: &SecretToken) -> AuthResult<Profile>;
}

/// User service registration endpoint
#[trait_variant::make(RegistrationGateway: Send)]
pub trait LocalRegistrationGateway {
    async fn register(&self, registration: &Registration) -> AuthResult<RegistrationReceipt>;
}
