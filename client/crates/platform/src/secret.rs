//! Secret Values
//!
//! Passwords and bearer tokens held by the client.
//!
//! ## Security Features
//! - Memory zeroized on drop
//! - Debug output is redacted
//! - Password policy applied before anything leaves the process

use std::fmt;

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Minimum password length accepted by the identity provider
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    /// Password is too short
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    /// Password is too long
    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    /// Password contains only whitespace
    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,
}

// ============================================================================
// Clear Text Password
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Does not implement `Clone`.
///
/// ## Examples
/// ```rust
/// use platform::secret::ClearTextPassword;
///
/// let password = ClearTextPassword::new("hunter22".to_string()).unwrap();
/// assert_eq!(format!("{password:?}"), "ClearTextPassword([REDACTED])");
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a password for a new account, enforcing the length policy
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let password = Self::for_sign_in(raw)?;

        let char_count = password.0.chars().count();
        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }
        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        Ok(password)
    }

    /// Create a password for signing in to an existing account
    ///
    /// Only blank input is rejected; the provider owns every other rule.
    pub fn for_sign_in(raw: String) -> Result<Self, PasswordPolicyError> {
        if raw.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }
        Ok(Self(raw))
    }

    /// Borrow the clear text for a request body
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClearTextPassword([REDACTED])")
    }
}

// ============================================================================
// Secret Token
// ============================================================================

/// Bearer token (ID token, refresh token)
///
/// Cloning is allowed: the token is attached to several outgoing requests.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretToken(String);

impl SecretToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretToken([REDACTED])")
    }
}
