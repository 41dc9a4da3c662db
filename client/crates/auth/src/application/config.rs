//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::config::{env_or, env_secs};

use crate::domain::entity::profile::FALLBACK_FULL_NAME;

/// Default user service base URL
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Profile endpoints tried in order; the first 2xx wins
pub const PROFILE_PATHS: [&str; 3] = [
    "/user/api/user/profile",
    "/user/api/profile",
    "/user/user/profile",
];

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// User service base URL
    pub api_base_url: String,
    /// Ordered profile endpoint candidates
    pub profile_paths: Vec<String>,
    /// Public registration endpoint
    pub register_path: String,
    /// Storage key for the bearer token
    pub token_key: String,
    /// Storage key for the signed-in email
    pub email_key: String,
    /// Route unauthenticated users are sent to
    pub login_route: String,
    /// Route for everything else that is turned away
    pub home_route: String,
    /// Budget for a single profile candidate request
    pub profile_request_timeout: Duration,
    /// Budget for the whole admin role check
    pub role_check_timeout: Duration,
    /// Display name of the degraded profile
    pub fallback_full_name: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            profile_paths: PROFILE_PATHS.iter().map(|p| p.to_string()).collect(),
            register_path: "/user/api/public/register".to_string(),
            token_key: "userToken".to_string(),
            email_key: "userEmail".to_string(),
            login_route: "/login".to_string(),
            home_route: "/".to_string(),
            profile_request_timeout: Duration::from_secs(10),
            role_check_timeout: Duration::from_secs(30),
            fallback_full_name: FALLBACK_FULL_NAME.to_string(),
        }
    }
}

impl AuthConfig {
    /// Create config for development (short timeouts)
    pub fn development() -> Self {
        Self {
            profile_request_timeout: Duration::from_secs(3),
            role_check_timeout: Duration::from_secs(10),
            ..Default::default()
        }
    }

    /// Read overrides from the environment
    ///
    /// - `EVENTBOOK_API_URL`
    /// - `EVENTBOOK_REQUEST_TIMEOUT_SECS`
    /// - `EVENTBOOK_ROLE_TIMEOUT_SECS`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: env_or("EVENTBOOK_API_URL", &defaults.api_base_url),
            profile_request_timeout: env_secs(
                "EVENTBOOK_REQUEST_TIMEOUT_SECS",
                defaults.profile_request_timeout,
            ),
            role_check_timeout: env_secs("EVENTBOOK_ROLE_TIMEOUT_SECS", defaults.role_check_timeout),
            ..defaults
        }
    }

    /// Point at a different user service
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_routes_and_keys() {
        let config = AuthConfig::default();
        assert_eq!(config.login_route, "/login");
        assert_eq!(config.home_route, "/");
        assert_eq!(config.token_key, "userToken");
        assert_eq!(config.email_key, "userEmail");
        assert_eq!(config.profile_paths.len(), 3);
        assert_eq!(config.profile_paths[0], "/user/api/user/profile");
    }

    #[test]
    fn test_with_api_base_url() {
        let config = AuthConfig::development().with_api_base_url("http://127.0.0.1:9000");
        assert_eq!(config.api_base_url, "http://127.0.0.1:9000");
        assert_eq!(config.profile_request_timeout, Duration::from_secs(3));
    }
}
