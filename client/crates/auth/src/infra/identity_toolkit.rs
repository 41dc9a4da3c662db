//! Identity Toolkit Backend
//!
//! REST client for an identity-toolkit style provider:
//!
//! - `POST {sign_in_url}/accounts:signInWithPassword?key=API_KEY`
//! - `POST {token_url}/token?key=API_KEY` (`grant_type=refresh_token`)
//!
//! Like a vendor SDK, the backend keeps its own session (uid, tokens, expiry)
//! in the origin's key/value storage so the signed-in identity survives a
//! restart.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use platform::config::{env_opt, env_or};
use platform::http::join_url;
use platform::secret::{ClearTextPassword, SecretToken};
use platform::storage::SharedStore;
use serde::{Deserialize, Serialize};

use crate::domain::entity::Identity;
use crate::domain::repository::IdentityBackend;
use crate::domain::value_object::Email;
use crate::error::{AuthError, AuthResult};

/// Cached ID tokens are refreshed this long before they expire
const EXPIRY_SKEW_MS: i64 = 30_000;

/// Provider messages meaning "wrong email or password"
const CREDENTIAL_ERRORS: [&str; 6] = [
    "INVALID_PASSWORD",
    "EMAIL_NOT_FOUND",
    "INVALID_LOGIN_CREDENTIALS",
    "USER_DISABLED",
    "INVALID_EMAIL",
    "MISSING_PASSWORD",
];

/// Provider messages meaning the stored session is gone for good
const SESSION_ERRORS: [&str; 4] = [
    "TOKEN_EXPIRED",
    "USER_NOT_FOUND",
    "INVALID_REFRESH_TOKEN",
    "USER_DISABLED",
];

/// Identity provider endpoints
#[derive(Debug, Clone)]
pub struct IdentityToolkitConfig {
    pub sign_in_url: String,
    pub token_url: String,
    pub api_key: String,
    /// Storage key for the persisted provider session
    pub session_key: String,
}

impl Default for IdentityToolkitConfig {
    fn default() -> Self {
        Self {
            sign_in_url: "https://identitytoolkit.googleapis.com/v1".to_string(),
            token_url: "https://securetoken.googleapis.com/v1".to_string(),
            api_key: String::new(),
            session_key: "identityToolkit:session".to_string(),
        }
    }
}

impl IdentityToolkitConfig {
    /// Read `EVENTBOOK_IDENTITY_URL`, `EVENTBOOK_TOKEN_URL`, `EVENTBOOK_API_KEY`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            sign_in_url: env_or("EVENTBOOK_IDENTITY_URL", &defaults.sign_in_url),
            token_url: env_or("EVENTBOOK_TOKEN_URL", &defaults.token_url),
            api_key: env_opt("EVENTBOOK_API_KEY").unwrap_or_default(),
            ..defaults
        }
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    email: Option<String>,
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

#[derive(Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
    user_id: String,
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    error: ProviderError,
}

#[derive(Deserialize)]
struct ProviderError {
    message: String,
}

/// Provider session as persisted
#[derive(Clone, Serialize, Deserialize)]
struct StoredSession {
    uid: String,
    email: Option<String>,
    id_token: String,
    refresh_token: String,
    expires_at_ms: i64,
}

impl StoredSession {
    fn identity(&self) -> Identity {
        Identity::new(self.uid.clone(), self.email.clone())
    }

    fn is_fresh(&self, now_ms: i64) -> bool {
        self.expires_at_ms - EXPIRY_SKEW_MS > now_ms
    }
}

fn expires_at(expires_in: &str) -> i64 {
    let secs = expires_in.trim().parse::<i64>().unwrap_or(0);
    Utc::now().timestamp_millis() + secs * 1000
}

/// Leading error code of a provider message (`"TOO_MANY_ATTEMPTS : ..."`)
fn error_code(message: &str) -> &str {
    message.split([' ', ':']).next().unwrap_or(message)
}

async fn provider_error(response: reqwest::Response) -> (u16, String) {
    let status = response.status().as_u16();
    let body = platform::http::body_text(response).await;
    let message = serde_json::from_str::<ProviderErrorBody>(&body)
        .map(|b| b.error.message)
        .unwrap_or(body);
    (status, message)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Backend
// ============================================================================

pub struct HttpIdentityBackend {
    client: reqwest::Client,
    config: IdentityToolkitConfig,
    store: SharedStore,
    session: Mutex<Option<StoredSession>>,
}

impl HttpIdentityBackend {
    /// Create the backend, restoring any persisted session
    pub fn new(client: reqwest::Client, config: IdentityToolkitConfig, store: SharedStore) -> Self {
        let session = Self::restore(&store, &config.session_key);
        if let Some(session) = &session {
            tracing::debug!(uid = %session.uid, "Restored identity provider session");
        }
        Self {
            client,
            config,
            store,
            session: Mutex::new(session),
        }
    }

    fn restore(store: &SharedStore, key: &str) -> Option<StoredSession> {
        let raw = match store.get(key) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read identity provider session");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable identity provider session");
                None
            }
        }
    }

    fn replace_session(&self, session: Option<StoredSession>) {
        let result = match &session {
            Some(s) => serde_json::to_string(s)
                .map_err(|e| e.to_string())
                .and_then(|raw| {
                    self.store
                        .set(&self.config.session_key, &raw)
                        .map_err(|e| e.to_string())
                }),
            None => self
                .store
                .remove(&self.config.session_key)
                .map_err(|e| e.to_string()),
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to persist identity provider session");
        }
        *lock(&self.session) = session;
    }

    async fn refresh(&self, refresh_token: &str) -> AuthResult<StoredSession> {
        let url = join_url(&self.config.token_url, "token");
        let response = self
            .client
            .post(url)
            .query(&[("key", self.config.api_key.as_str())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, message) = provider_error(response).await;
            if SESSION_ERRORS.contains(&error_code(&message)) {
                tracing::info!(reason = %message, "Identity provider session ended");
                self.replace_session(None);
                return Err(AuthError::NotAuthenticated);
            }
            tracing::warn!(status, message = %message, "Token refresh rejected");
            return Err(AuthError::Provider(message));
        }

        let body: RefreshResponse = response.json().await?;
        let email = lock(&self.session).as_ref().and_then(|s| s.email.clone());
        Ok(StoredSession {
            uid: body.user_id,
            email,
            expires_at_ms: expires_at(&body.expires_in),
            id_token: body.id_token,
            refresh_token: body.refresh_token,
        })
    }
}

impl IdentityBackend for HttpIdentityBackend {
    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &ClearTextPassword,
    ) -> AuthResult<Identity> {
        let url = join_url(&self.config.sign_in_url, "accounts:signInWithPassword");
        let response = self
            .client
            .post(url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&SignInRequest {
                email: email.as_str(),
                password: password.expose(),
                return_secure_token: true,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, message) = provider_error(response).await;
            if CREDENTIAL_ERRORS.contains(&error_code(&message)) {
                return Err(AuthError::InvalidCredentials);
            }
            tracing::warn!(status, message = %message, "Sign-in rejected by identity provider");
            return Err(AuthError::Provider(message));
        }

        let body: SignInResponse = response.json().await?;
        let session = StoredSession {
            uid: body.local_id,
            email: body.email.or_else(|| Some(email.as_str().to_string())),
            expires_at_ms: expires_at(&body.expires_in),
            id_token: body.id_token,
            refresh_token: body.refresh_token,
        };
        let identity = session.identity();
        self.replace_session(Some(session));
        Ok(identity)
    }

    async fn sign_out(&self) -> AuthResult<()> {
        self.replace_session(None);
        Ok(())
    }

    fn current_user(&self) -> Option<Identity> {
        lock(&self.session).as_ref().map(StoredSession::identity)
    }

    async fn id_token(&self, identity: &Identity, force_refresh: bool) -> AuthResult<SecretToken> {
        let current = lock(&self.session)
            .clone()
            .filter(|s| s.uid == identity.uid)
            .ok_or(AuthError::NotAuthenticated)?;

        if !force_refresh && current.is_fresh(Utc::now().timestamp_millis()) {
            return Ok(SecretToken::new(current.id_token));
        }

        let refreshed = self.refresh(&current.refresh_token).await?;
        let token = SecretToken::new(refreshed.id_token.clone());
        self.replace_session(Some(refreshed));
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use platform::storage::MemoryStore;
    use wiremock::matchers::{body_json, body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn http_backend(server: &MockServer, store: SharedStore) -> HttpIdentityBackend {
        let config = IdentityToolkitConfig {
            sign_in_url: format!("{}/v1", server.uri()),
            token_url: format!("{}/v1", server.uri()),
            api_key: "test-key".to_string(),
            ..Default::default()
        };
        HttpIdentityBackend::new(reqwest::Client::new(), config, store)
    }

    fn email() -> Email {
        Email::new("ada@example.com").unwrap()
    }

    fn password() -> ClearTextPassword {
        ClearTextPassword::for_sign_in("secret1".to_string()).unwrap()
    }

    async fn mount_sign_in(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/v1/accounts:signInWithPassword"))
            .and(query_param("key", "test-key"))
            .and(body_json(serde_json::json!({
                "email": "ada@example.com",
                "password": "secret1",
                "returnSecureToken": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "localId": "uid-ada",
                "email": "ada@example.com",
                "idToken": "id-1",
                "refreshToken": "refresh-1",
                "expiresIn": "3600"
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_sign_in_persists_session() {
        let server = MockServer::start().await;
        mount_sign_in(&server).await;
        let store = MemoryStore::shared();

        let backend = http_backend(&server, Arc::clone(&store));
        let identity = backend.sign_in_with_password(&email(), &password()).await.unwrap();
        assert_eq!(identity.uid, "uid-ada");

        let token = backend.id_token(&identity, false).await.unwrap();
        assert_eq!(token.expose(), "id-1");

        // A second instance over the same storage sees the same identity
        let restored = http_backend(&server, store);
        assert_eq!(restored.current_user(), Some(identity));
    }

    #[tokio::test]
    async fn test_rejected_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/accounts:signInWithPassword"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": { "code": 400, "message": "INVALID_LOGIN_CREDENTIALS" }
            })))
            .mount(&server)
            .await;

        let backend = http_backend(&server, MemoryStore::shared());
        let err = backend
            .sign_in_with_password(&email(), &password())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(backend.current_user().is_none());
    }

    #[tokio::test]
    async fn test_throttling_is_a_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/accounts:signInWithPassword"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": { "message": "TOO_MANY_ATTEMPTS_TRY_LATER : Access disabled" }
            })))
            .mount(&server)
            .await;

        let backend = http_backend(&server, MemoryStore::shared());
        let err = backend
            .sign_in_with_password(&email(), &password())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Provider(_)));
    }

    #[tokio::test]
    async fn test_forced_refresh() {
        let server = MockServer::start().await;
        mount_sign_in(&server).await;
        Mock::given(method("POST"))
            .and(path("/v1/token"))
            .and(query_param("key", "test-key"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=refresh-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id_token": "id-2",
                "refresh_token": "refresh-2",
                "expires_in": "3600",
                "user_id": "uid-ada"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let backend = http_backend(&server, MemoryStore::shared());
        let identity = backend.sign_in_with_password(&email(), &password()).await.unwrap();
        let token = backend.id_token(&identity, true).await.unwrap();
        assert_eq!(token.expose(), "id-2");
        assert_eq!(
            backend.current_user().and_then(|i| i.email).as_deref(),
            Some("ada@example.com")
        );
    }

    #[tokio::test]
    async fn test_revoked_refresh_token_ends_session() {
        let server = MockServer::start().await;
        mount_sign_in(&server).await;
        Mock::given(method("POST"))
            .and(path("/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": { "message": "TOKEN_EXPIRED" }
            })))
            .mount(&server)
            .await;

        let store = MemoryStore::shared();
        let backend = http_backend(&server, Arc::clone(&store));
        let identity = backend.sign_in_with_password(&email(), &password()).await.unwrap();

        let err = backend.id_token(&identity, true).await.unwrap_err();
        assert!(matches!(err, AuthError::NotAuthenticated));
        assert!(backend.current_user().is_none());
        assert_eq!(store.get("identityToolkit:session").unwrap(), None);
    }

    #[tokio::test]
    async fn test_sign_out_is_local() {
        let server = MockServer::start().await;
        mount_sign_in(&server).await;
        let backend = http_backend(&server, MemoryStore::shared());
        backend.sign_in_with_password(&email(), &password()).await.unwrap();

        backend.sign_out().await.unwrap();
        assert!(backend.current_user().is_none());
    }

    #[test]
    fn test_corrupt_session_is_discarded() {
        let store = MemoryStore::shared();
        store.set("identityToolkit:session", "{oops").unwrap();
        let backend = HttpIdentityBackend::new(
            reqwest::Client::new(),
            IdentityToolkitConfig::default(),
            store,
        );
        assert!(backend.current_user().is_none());
    }

    #[test]
    fn test_error_code() {
        assert_eq!(
            error_code("TOO_MANY_ATTEMPTS_TRY_LATER : Access disabled"),
            "TOO_MANY_ATTEMPTS_TRY_LATER"
        );
        assert_eq!(error_code("EMAIL_NOT_FOUND"), "EMAIL_NOT_FOUND");
    }
}
