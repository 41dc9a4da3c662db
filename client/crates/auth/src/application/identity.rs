//! Identity Provider Adapter
//!
//! Wraps an [`IdentityBackend`] with credential persistence and sequenced
//! change notification. Once signed out locally, the backend's identity is
//! hidden until the next successful sign-in, even if the provider failed to
//! drop its own session.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use platform::secret::{ClearTextPassword, SecretToken};

use crate::application::credential_store::CredentialStore;
use crate::application::notifier::{IdentityNotifier, Subscription};
use crate::domain::entity::{Credential, Identity};
use crate::domain::repository::IdentityBackend;
use crate::domain::value_object::Email;
use crate::error::{AuthError, AuthResult};

pub struct IdentityProvider<B>
where
    B: IdentityBackend,
{
    backend: Arc<B>,
    credentials: CredentialStore,
    notifier: IdentityNotifier,
    signed_out: AtomicBool,
}

impl<B> IdentityProvider<B>
where
    B: IdentityBackend + Send + Sync + 'static,
{
    pub fn new(backend: Arc<B>, credentials: CredentialStore) -> Self {
        Self {
            backend,
            credentials,
            notifier: IdentityNotifier::new(),
            signed_out: AtomicBool::new(false),
        }
    }

    /// Sign in, persist the credential and notify subscribers
    pub async fn sign_in(&self, email: &str, password: &ClearTextPassword) -> AuthResult<Credential> {
        let email = Email::new(email).map_err(|_| AuthError::InvalidCredentials)?;

        let identity = self.backend.sign_in_with_password(&email, password).await?;
        let token = self.backend.id_token(&identity, false).await?;

        let credential = Credential::new(token, email.as_str());
        self.signed_out.store(false, Ordering::SeqCst);
        self.credentials.save(&credential);
        self.notifier.publish(Some(identity));

        tracing::info!(email = %email, "User signed in");
        Ok(credential)
    }

    /// Sign out locally regardless of what the provider says
    pub async fn sign_out(&self) {
        self.signed_out.store(true, Ordering::SeqCst);
        if let Err(e) = self.backend.sign_out().await {
            tracing::warn!(error = %e, "Identity provider sign-out failed");
        }
        self.credentials.clear();
        self.notifier.publish(None);
        tracing::info!("User signed out");
    }

    /// Identity as the client sees it; `None` after a local sign-out
    pub fn current_identity(&self) -> Option<Identity> {
        if self.signed_out.load(Ordering::SeqCst) {
            return None;
        }
        self.backend.current_user()
    }

    /// Freshest token available
    ///
    /// Forces a refresh when a live identity exists, otherwise falls back to
    /// the persisted token. A refresh failure yields `None`.
    pub async fn refresh_token(&self) -> Option<SecretToken> {
        match self.current_identity() {
            Some(identity) => match self.backend.id_token(&identity, true).await {
                Ok(token) => Some(token),
                Err(e) => {
                    tracing::warn!(error = %e, "Token refresh failed");
                    None
                }
            },
            None => self.credentials.token(),
        }
    }

    /// Cache-then-confirm check: live identity or persisted token
    pub fn is_authenticated_now(&self) -> bool {
        self.current_identity().is_some() || self.credentials.has_token()
    }

    /// Subscribe to identity changes; the current state arrives first
    pub fn subscribe(&self) -> Subscription {
        self.notifier.subscribe(|| self.current_identity())
    }

    /// Publish a transition that happened inside the backend
    /// (token expiry, sign-in from another context)
    pub fn handle_backend_change(&self, identity: Option<Identity>) -> u64 {
        tracing::debug!(signed_in = identity.is_some(), "Identity backend state changed");
        if identity.is_some() {
            self.signed_out.store(false, Ordering::SeqCst);
        }
        self.notifier.publish(identity)
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    pub fn subscriber_count(&self) -> usize {
        self.notifier.subscriber_count()
    }
}

#[cfg(test)]
mod tests {
    use platform::storage::MemoryStore;

    use super::*;
    use crate::application::config::AuthConfig;
    use crate::infra::memory::InMemoryIdentityBackend;

    fn provider() -> IdentityProvider<InMemoryIdentityBackend> {
        let backend = Arc::new(InMemoryIdentityBackend::new());
        backend.add_account("ada@example.com", "secret1");
        let credentials = CredentialStore::new(MemoryStore::shared(), &AuthConfig::default());
        IdentityProvider::new(backend, credentials)
    }

    fn password(raw: &str) -> ClearTextPassword {
        ClearTextPassword::for_sign_in(raw.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_sign_in_persists_and_notifies() {
        let provider = provider();
        let mut sub = provider.subscribe();
        assert_eq!(sub.recv().await.unwrap().identity, None);

        let credential = provider
            .sign_in("Ada@Example.com", &password("secret1"))
            .await
            .unwrap();
        assert_eq!(credential.email, "ada@example.com");
        assert_eq!(provider.credentials().read(), Some(credential));
        assert!(provider.is_authenticated_now());

        let event = sub.recv().await.unwrap();
        assert!(event.is_signed_in());
    }

    #[tokio::test]
    async fn test_sign_in_rejected() {
        let provider = provider();
        let err = provider
            .sign_in("ada@example.com", &password("wrong-one"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        let err = provider
            .sign_in("not-an-email", &password("secret1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(!provider.is_authenticated_now());
    }

    #[tokio::test]
    async fn test_sign_out_clears_even_when_provider_fails() {
        let provider = provider();
        provider
            .sign_in("ada@example.com", &password("secret1"))
            .await
            .unwrap();

        provider.backend().fail_sign_out(true);
        let mut sub = provider.subscribe();
        sub.recv().await.unwrap();

        provider.sign_out().await;
        assert!(provider.credentials().read().is_none());
        assert_eq!(sub.recv().await.unwrap().identity, None);

        // The provider still holds its session, but the client must not
        assert!(provider.backend().current_user().is_some());
        assert!(!provider.is_authenticated_now());
        assert_eq!(provider.current_identity(), None);
        assert!(provider.refresh_token().await.is_none());

        let mut late = provider.subscribe();
        assert_eq!(late.recv().await.unwrap().identity, None);
    }

    #[tokio::test]
    async fn test_sign_in_after_failed_sign_out_restores_identity() {
        let provider = provider();
        provider.backend().fail_sign_out(true);
        provider
            .sign_in("ada@example.com", &password("secret1"))
            .await
            .unwrap();
        provider.sign_out().await;
        assert!(!provider.is_authenticated_now());

        provider
            .sign_in("ada@example.com", &password("secret1"))
            .await
            .unwrap();
        assert!(provider.is_authenticated_now());
        assert!(provider.refresh_token().await.is_some());

        provider.sign_out().await;
        let identity = provider.backend().current_user();
        assert!(identity.is_some());
        provider.handle_backend_change(identity.clone());
        assert_eq!(provider.current_identity(), identity);
    }

    #[tokio::test]
    async fn test_is_authenticated_now_tracks_calls_before_events() {
        let provider = provider();
        provider
            .sign_in("ada@example.com", &password("secret1"))
            .await
            .unwrap();
        assert!(provider.is_authenticated_now());

        provider.sign_out().await;
        assert!(!provider.is_authenticated_now());
    }

    #[tokio::test]
    async fn test_refresh_token_fallbacks() {
        let provider = provider();
        assert!(provider.refresh_token().await.is_none());

        // Persisted token only
        provider
            .credentials()
            .save(&Credential::new(SecretToken::new("cached"), "ada@example.com"));
        assert_eq!(provider.refresh_token().await.unwrap().expose(), "cached");

        // Live identity with a failing refresh yields nothing
        provider
            .sign_in("ada@example.com", &password("secret1"))
            .await
            .unwrap();
        provider.backend().fail_token_refresh(true);
        assert!(provider.refresh_token().await.is_none());

        provider.backend().fail_token_refresh(false);
        let token = provider.refresh_token().await.unwrap();
        assert_ne!(token.expose(), "cached");
    }

    #[tokio::test]
    async fn test_backend_change_is_published() {
        let provider = provider();
        let mut sub = provider.subscribe();
        let first = sub.recv().await.unwrap();

        let seq = provider.handle_backend_change(None);
        let event = sub.recv().await.unwrap();
        assert_eq!(event.seq, seq);
        assert!(event.seq > first.seq);
    }
}
