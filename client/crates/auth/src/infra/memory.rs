//! In-Memory Adapters
//!
//! [`InMemoryIdentityBackend`] keeps an account table and the signed-in
//! identity in process. [`ScriptedUserApi`] answers profile and registration
//! requests from a per-path script. Both can simulate failures.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use platform::secret::{ClearTextPassword, SecretToken};

use crate::domain::entity::{Identity, Profile, Registration, RegistrationReceipt};
use crate::domain::repository::{IdentityBackend, ProfileSource, RegistrationGateway};
use crate::domain::value_object::{Email, Role};
use crate::error::{AuthError, AuthResult};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Identity Backend
// ============================================================================

struct Account {
    uid: String,
    password: String,
}

#[derive(Default)]
pub struct InMemoryIdentityBackend {
    accounts: Mutex<HashMap<String, Account>>,
    current: Mutex<Option<Identity>>,
    fail_sign_out: AtomicBool,
    fail_token_refresh: AtomicBool,
    token_counter: AtomicU64,
}

impl InMemoryIdentityBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account and return its identity
    pub fn add_account(&self, email: &str, password: &str) -> Identity {
        let email = email.trim().to_lowercase();
        let uid = format!("uid-{}", uuid::Uuid::new_v4().simple());
        lock(&self.accounts).insert(
            email.clone(),
            Account {
                uid: uid.clone(),
                password: password.to_string(),
            },
        );
        Identity::new(uid, Some(email))
    }

    /// Make the provider's sign-out call fail
    pub fn fail_sign_out(&self, fail: bool) {
        self.fail_sign_out.store(fail, Ordering::SeqCst);
    }

    /// Make token issuance fail
    pub fn fail_token_refresh(&self, fail: bool) {
        self.fail_token_refresh.store(fail, Ordering::SeqCst);
    }

    /// Replace the signed-in identity without going through sign-in,
    /// as an expiry or another context would
    pub fn set_current(&self, identity: Option<Identity>) {
        *lock(&self.current) = identity;
    }
}

impl IdentityBackend for InMemoryIdentityBackend {
    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &ClearTextPassword,
    ) -> AuthResult<Identity> {
        let uid = {
            let accounts = lock(&self.accounts);
            match accounts.get(email.as_str()) {
                Some(account) if account.password == password.expose() => account.uid.clone(),
                _ => return Err(AuthError::InvalidCredentials),
            }
        };

        let identity = Identity::new(uid, Some(email.as_str().to_string()));
        *lock(&self.current) = Some(identity.clone());
        Ok(identity)
    }

    async fn sign_out(&self) -> AuthResult<()> {
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(AuthError::Provider("sign-out unavailable".to_string()));
        }
        *lock(&self.current) = None;
        Ok(())
    }

    fn current_user(&self) -> Option<Identity> {
        lock(&self.current).clone()
    }

    async fn id_token(&self, identity: &Identity, _force_refresh: bool) -> AuthResult<SecretToken> {
        if self.fail_token_refresh.load(Ordering::SeqCst) {
            return Err(AuthError::Provider("token service unavailable".to_string()));
        }
        let signed_in = lock(&self.current)
            .as_ref()
            .is_some_and(|current| current.uid == identity.uid);
        if !signed_in {
            return Err(AuthError::NotAuthenticated);
        }
        let n = self.token_counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(SecretToken::new(format!("mem.{}.{n}", identity.uid)))
    }
}

// ============================================================================
// User Service
// ============================================================================

/// How a scripted profile path answers
#[derive(Debug, Clone)]
pub enum EndpointScript {
    Respond(Profile),
    Status(u16),
    NetworkError,
    /// Never answers
    Hang,
}

#[derive(Default)]
pub struct ScriptedUserApi {
    endpoints: Mutex<HashMap<String, EndpointScript>>,
    requests: Mutex<Vec<String>>,
    registrations: Mutex<Vec<(String, Option<String>)>>,
    admin_secret: Option<String>,
}

impl ScriptedUserApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registrations carrying this secret are created as admins
    pub fn with_admin_secret(mut self, secret: impl Into<String>) -> Self {
        self.admin_secret = Some(secret.into());
        self
    }

    pub fn with_endpoint(self, path: &str, script: EndpointScript) -> Self {
        self.set_endpoint(path, script);
        self
    }

    pub fn set_endpoint(&self, path: &str, script: EndpointScript) {
        lock(&self.endpoints).insert(path.to_string(), script);
    }

    /// Paths requested so far, in order
    pub fn requested_paths(&self) -> Vec<String> {
        lock(&self.requests).clone()
    }

    pub fn registered_emails(&self) -> Vec<String> {
        lock(&self.registrations)
            .iter()
            .map(|(email, _)| email.clone())
            .collect()
    }

    /// Admin secret sent with the latest registration; `None` if none yet
    pub fn last_admin_secret(&self) -> Option<Option<String>> {
        lock(&self.registrations)
            .last()
            .map(|(_, secret)| secret.clone())
    }
}

impl ProfileSource for ScriptedUserApi {
    async fn fetch_profile_at(&self, path: &str, _token: &SecretToken) -> AuthResult<Profile> {
        lock(&self.requests).push(path.to_string());
        let script = lock(&self.endpoints).get(path).cloned();

        match script {
            Some(EndpointScript::Respond(profile)) => Ok(profile),
            Some(EndpointScript::Status(status)) => Err(AuthError::UnexpectedStatus { status }),
            Some(EndpointScript::NetworkError) => {
                Err(AuthError::Network("connection refused".to_string()))
            }
            Some(EndpointScript::Hang) => std::future::pending().await,
            None => Err(AuthError::UnexpectedStatus { status: 404 }),
        }
    }
}

impl RegistrationGateway for ScriptedUserApi {
    async fn register(&self, registration: &Registration) -> AuthResult<RegistrationReceipt> {
        let email = registration.email.as_str().to_string();
        let mut registrations = lock(&self.registrations);
        if registrations.iter().any(|(known, _)| *known == email) {
            return Err(AuthError::RegistrationRejected {
                status: 400,
                body: r#"{"error":"User with this email already exists"}"#.to_string(),
            });
        }
        registrations.push((email.clone(), registration.admin_secret.clone()));
        drop(registrations);

        let admin = self.admin_secret.is_some()
            && registration.admin_secret.as_deref() == self.admin_secret.as_deref();
        let profile = Profile {
            id: None,
            firebase_uid: None,
            email: Some(email),
            full_name: registration.full_name.clone(),
            phone_number: Some(registration.phone_number.clone()),
            role: if admin { Role::Admin } else { Role::User },
            created_at: None,
            updated_at: None,
            degraded: false,
        };

        Ok(RegistrationReceipt {
            message: Some("User registered successfully".to_string()),
            profile: Some(profile),
        })
    }
}
