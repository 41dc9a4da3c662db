//! HTTP Client Utilities
//!
//! Construction of the shared `reqwest` client plus helpers for building
//! request URLs and headers.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, InvalidHeaderValue};

use crate::secret::SecretToken;

/// Outgoing HTTP client settings
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Total time allowed for one request
    pub request_timeout: Duration,
    /// Time allowed to establish the connection
    pub connect_timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            user_agent: concat!("eventbook-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Build a client with bounded timeouts
///
/// ## Errors
/// Fails only if the TLS backend cannot be initialized.
pub fn build_client(config: &HttpClientConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(config.request_timeout)
        .connect_timeout(config.connect_timeout)
        .user_agent(config.user_agent.clone())
        .build()
}

/// Join a base URL and a path with exactly one `/` between them
///
/// ## Examples
/// ```rust
/// use platform::http::join_url;
/// assert_eq!(join_url("http://api/", "/user/api/profile"), "http://api/user/api/profile");
/// assert_eq!(join_url("http://api", "user/api/profile"), "http://api/user/api/profile");
/// ```
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// `Authorization: Bearer <token>` header value, marked sensitive
pub fn bearer(token: &SecretToken) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose()))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Header map carrying only the bearer authorization
pub fn bearer_headers(token: &SecretToken) -> Result<HeaderMap, InvalidHeaderValue> {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, bearer(token)?);
    Ok(headers)
}

/// Read a response body as text, never failing
///
/// Used when a non-2xx body is only surfaced as a message.
pub async fn body_text(response: reqwest::Response) -> String {
    match response.text().await {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!(error = %e, "Failed to read response body");
            String::new()
        }
    }
}
