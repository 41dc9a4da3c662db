//! Credential Store
//!
//! Token and email persisted under fixed keys in the origin's key/value
//! storage. Storage failures are logged and read as absent; callers never
//! see them.

use platform::secret::SecretToken;
use platform::storage::SharedStore;

use crate::application::config::AuthConfig;
use crate::domain::entity::Credential;

#[derive(Clone)]
pub struct CredentialStore {
    store: SharedStore,
    token_key: String,
    email_key: String,
}

impl CredentialStore {
    pub fn new(store: SharedStore, config: &AuthConfig) -> Self {
        Self {
            store,
            token_key: config.token_key.clone(),
            email_key: config.email_key.clone(),
        }
    }

    /// Persist both values, overwriting
    pub fn save(&self, credential: &Credential) {
        self.write(&self.token_key, credential.token.expose());
        self.write(&self.email_key, &credential.email);
    }

    /// Remove both values; idempotent
    pub fn clear(&self) {
        for key in [&self.token_key, &self.email_key] {
            if let Err(e) = self.store.remove(key) {
                tracing::warn!(key = %key, error = %e, "Failed to clear credential");
            }
        }
    }

    /// Token and email, when both are present
    pub fn read(&self) -> Option<Credential> {
        Some(Credential::new(self.token()?, self.email()?))
    }

    pub fn token(&self) -> Option<SecretToken> {
        self.read_key(&self.token_key).map(SecretToken::new)
    }

    pub fn email(&self) -> Option<String> {
        self.read_key(&self.email_key)
    }

    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }

    fn read_key(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read credential");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            tracing::warn!(key, error = %e, "Failed to persist credential");
        }
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("token_key", &self.token_key)
            .field("email_key", &self.email_key)
            .finish_non_exhaustive()
    }
}
