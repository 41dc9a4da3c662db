//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::secret::PasswordPolicyError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Identity provider rejected the email/password pair
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// No live identity and no persisted token
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Transport failure talking to a remote service
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded its time budget
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Registration endpoint answered with a non-2xx status
    #[error("Registration failed ({status}): {body}")]
    RegistrationRejected { status: u16, body: String },

    /// Remote service answered with an unexpected status
    #[error("Unexpected response status {status}")]
    UnexpectedStatus { status: u16 },

    /// Client-side input validation failed
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Identity provider failure other than bad credentials
    #[error("Identity provider error: {0}")]
    Provider(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials | AuthError::NotAuthenticated => ErrorKind::Unauthorized,
            AuthError::Network(_) => ErrorKind::Network,
            AuthError::Timeout(_) => ErrorKind::RequestTimeout,
            AuthError::RegistrationRejected { status, .. }
            | AuthError::UnexpectedStatus { status } => ErrorKind::from_status(*status),
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::Provider(_) => ErrorKind::ServiceUnavailable,
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::InvalidCredentials => AppError::new(self.kind(), self.to_string())
                .with_action("Check your email and password and try again."),
            AuthError::NotAuthenticated => {
                AppError::new(self.kind(), self.to_string()).with_action("Please log in.")
            }
            // The backend's own message is what the registration form shows
            AuthError::RegistrationRejected { body, .. } if !body.trim().is_empty() => {
                AppError::new(self.kind(), body.clone())
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Message suitable for showing to the end user
    pub fn user_message(&self) -> String {
        self.to_app_error().user_message().to_string()
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::Provider(msg) => {
                tracing::error!(message = %msg, "Identity provider error");
            }
            AuthError::Network(_) | AuthError::Timeout(_) => {
                tracing::warn!(error = %self, "Auth request failed");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::RegistrationRejected { status, .. } => {
                tracing::warn!(status, "Registration rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AuthError::Timeout(err.to_string())
        } else if let Some(status) = err.status() {
            AuthError::UnexpectedStatus {
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            AuthError::Internal(format!("Unexpected response body: {err}"))
        } else {
            AuthError::Network(err.to_string())
        }
    }
}

impl From<PasswordPolicyError> for AuthError {
    fn from(err: PasswordPolicyError) -> Self {
        AuthError::Validation(err.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        err.to_app_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(AuthError::InvalidCredentials.kind(), ErrorKind::Unauthorized);
        assert_eq!(AuthError::Network("refused".into()).kind(), ErrorKind::Network);
        assert_eq!(
            AuthError::RegistrationRejected {
                status: 400,
                body: String::new()
            }
            .kind(),
            ErrorKind::BadRequest
        );
        assert_eq!(
            AuthError::UnexpectedStatus { status: 503 }.kind(),
            ErrorKind::ServiceUnavailable
        );
    }

    #[test]
    fn test_network_errors_become_generic_message() {
        let err = AuthError::Network("connection refused".into());
        assert_eq!(
            err.user_message(),
            kernel::error::app_error::TRY_AGAIN_LATER
        );
    }

    #[test]
    fn test_registration_body_is_surfaced() {
        let err = AuthError::RegistrationRejected {
            status: 400,
            body: r#"{"error":"Email already registered"}"#.into(),
        };
        assert_eq!(err.user_message(), r#"{"error":"Email already registered"}"#);
    }

    #[test]
    fn test_password_policy_maps_to_validation() {
        let err: AuthError = PasswordPolicyError::EmptyOrWhitespace.into();
        assert!(matches!(err, AuthError::Validation(_)));
    }
}
