//! Credential Entity

use platform::secret::SecretToken;

/// Token and email persisted for the current origin
///
/// Written on sign-in, cleared on sign-out and after registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: SecretToken,
    pub email: String,
}

impl Credential {
    pub fn new(token: SecretToken, email: impl Into<String>) -> Self {
        Self {
            token,
            email: email.into(),
        }
    }
}
