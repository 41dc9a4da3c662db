//! Sign Up Use Case
//!
//! Registers a new account with the user service. Registration never signs
//! the user in: any stored credential is cleared and the caller is sent to
//! the login route.

use std::sync::Arc;

use platform::secret::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::application::credential_store::CredentialStore;
use crate::domain::entity::Registration;
use crate::domain::repository::RegistrationGateway;
use crate::domain::value_object::Email;
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone_number: String,
    pub admin_secret: Option<String>,
}

/// Sign up output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpOutput {
    /// Message from the user service, if any
    pub message: Option<String>,
    pub redirect_to: String,
}

/// Registration use case
pub struct RegisterUseCase<G>
where
    G: RegistrationGateway,
{
    gateway: Arc<G>,
    credentials: CredentialStore,
    config: Arc<AuthConfig>,
}

impl<G> RegisterUseCase<G>
where
    G: RegistrationGateway + Send + Sync + 'static,
{
    pub fn new(gateway: Arc<G>, credentials: CredentialStore, config: Arc<AuthConfig>) -> Self {
        Self {
            gateway,
            credentials,
            config,
        }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        let registration = Self::validate(input)?;

        let receipt = self
            .gateway
            .register(&registration)
            .await
            .inspect_err(|e| e.log())?;

        self.credentials.clear();

        tracing::info!(
            email = %registration.email,
            admin_requested = registration.admin_secret.is_some(),
            "User registered"
        );

        Ok(SignUpOutput {
            message: receipt.message,
            redirect_to: self.config.login_route.clone(),
        })
    }

    fn validate(input: SignUpInput) -> AuthResult<Registration> {
        let email = Email::new(input.email).map_err(|e| AuthError::Validation(e.message().to_string()))?;
        let password = ClearTextPassword::new(input.password)?;

        let full_name = input.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(AuthError::Validation("Full name is required".to_string()));
        }

        let phone_number = input.phone_number.trim().to_string();
        if phone_number.is_empty() {
            return Err(AuthError::Validation("Phone number is required".to_string()));
        }

        let admin_secret = input
            .admin_secret
            .map(|secret| secret.trim().to_string())
            .filter(|secret| !secret.is_empty());

        Ok(Registration {
            email,
            password,
            full_name,
            phone_number,
            admin_secret,
        })
    }
}

#[cfg(test)]
mod tests {
    use platform::secret::SecretToken;
    use platform::storage::MemoryStore;

    use super::*;
    use crate::domain::entity::Credential;
    use crate::infra::memory::ScriptedUserApi;

    fn input() -> SignUpInput {
        SignUpInput {
            email: "ada@example.com".into(),
            password: "secret1".into(),
            full_name: "Ada Lovelace".into(),
            phone_number: "+44 20 7946 0000".into(),
            admin_secret: None,
        }
    }

    fn use_case(api: Arc<ScriptedUserApi>) -> (RegisterUseCase<ScriptedUserApi>, CredentialStore) {
        let config = Arc::new(AuthConfig::default());
        let credentials = CredentialStore::new(MemoryStore::shared(), &config);
        (
            RegisterUseCase::new(api, credentials.clone(), config),
            credentials,
        )
    }

    #[tokio::test]
    async fn test_register_clears_prior_credentials() {
        let api = Arc::new(ScriptedUserApi::new());
        let (register, credentials) = use_case(Arc::clone(&api));
        credentials.save(&Credential::new(SecretToken::new("old"), "old@example.com"));

        let output = register.execute(input()).await.unwrap();
        assert_eq!(output.redirect_to, "/login");
        assert!(credentials.read().is_none());
        assert_eq!(api.registered_emails(), vec!["ada@example.com".to_string()]);
    }

    #[tokio::test]
    async fn test_blank_admin_secret_is_dropped() {
        let api = Arc::new(ScriptedUserApi::new());
        let (register, _) = use_case(Arc::clone(&api));

        let mut blank = input();
        blank.admin_secret = Some("   ".into());
        register.execute(blank).await.unwrap();
        assert_eq!(api.last_admin_secret(), Some(None));

        let mut with_secret = input();
        with_secret.email = "grace@example.com".into();
        with_secret.admin_secret = Some(" s3cret ".into());
        register.execute(with_secret).await.unwrap();
        assert_eq!(api.last_admin_secret(), Some(Some("s3cret".to_string())));
    }

    #[tokio::test]
    async fn test_validation_happens_before_any_request() {
        let api = Arc::new(ScriptedUserApi::new());
        let (register, _) = use_case(Arc::clone(&api));

        let mut short = input();
        short.password = "abc".into();
        assert!(matches!(
            register.execute(short).await,
            Err(AuthError::Validation(_))
        ));

        let mut bad_email = input();
        bad_email.email = "ada.example.com".into();
        assert!(matches!(
            register.execute(bad_email).await,
            Err(AuthError::Validation(_))
        ));

        let mut no_name = input();
        no_name.full_name = " ".into();
        assert!(matches!(
            register.execute(no_name).await,
            Err(AuthError::Validation(_))
        ));

        let mut no_phone = input();
        no_phone.phone_number = String::new();
        assert!(matches!(
            register.execute(no_phone).await,
            Err(AuthError::Validation(_))
        ));

        assert!(api.registered_emails().is_empty());
    }

    #[tokio::test]
    async fn test_rejection_keeps_credentials() {
        let api = Arc::new(ScriptedUserApi::new());
        let (register, credentials) = use_case(Arc::clone(&api));
        register.execute(input()).await.unwrap();

        credentials.save(&Credential::new(SecretToken::new("t"), "ada@example.com"));
        let err = register.execute(input()).await.unwrap_err();
        match err {
            AuthError::RegistrationRejected { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("already"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(credentials.has_token());
    }
}
