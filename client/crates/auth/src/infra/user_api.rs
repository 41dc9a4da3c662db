//! User Service HTTP Adapter
//!
//! Profile lookup and public registration against the event-booking user
//! service.

use platform::http::{bearer_headers, body_text, join_url};
use platform::secret::SecretToken;

use crate::application::config::AuthConfig;
use crate::domain::entity::{Profile, Registration, RegistrationReceipt};
use crate::domain::repository::{ProfileSource, RegistrationGateway};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{ProfileDto, RegisterRequest, RegisterResponse};

#[derive(Clone)]
pub struct HttpUserApi {
    client: reqwest::Client,
    base_url: String,
    register_path: String,
}

impl HttpUserApi {
    pub fn new(client: reqwest::Client, config: &AuthConfig) -> Self {
        Self {
            client,
            base_url: config.api_base_url.clone(),
            register_path: config.register_path.clone(),
        }
    }
}

impl ProfileSource for HttpUserApi {
    async fn fetch_profile_at(&self, path: &str, token: &SecretToken) -> AuthResult<Profile> {
        let headers = bearer_headers(token)
            .map_err(|_| AuthError::Internal("Token is not a valid header value".to_string()))?;

        let response = self
            .client
            .get(join_url(&self.base_url, path))
            .headers(headers)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let dto = ProfileDto::from_body(&body)
            .map_err(|e| AuthError::Internal(format!("Unreadable profile body: {e}")))?;
        Ok(dto.into_profile())
    }
}

impl RegistrationGateway for HttpUserApi {
    async fn register(&self, registration: &Registration) -> AuthResult<RegistrationReceipt> {
        let response = self
            .client
            .post(join_url(&self.base_url, &self.register_path))
            .json(&RegisterRequest::from(registration))
            .send()
            .await?;

        let status = response.status().as_u16();
        let ok = response.status().is_success();
        let body = body_text(response).await;

        if !ok {
            return Err(AuthError::RegistrationRejected { status, body });
        }

        // A 2xx with an unexpected body still means the account exists
        let receipt = serde_json::from_str::<RegisterResponse>(&body)
            .map(RegistrationReceipt::from)
            .unwrap_or_default();
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use platform::secret::ClearTextPassword;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::domain::value_object::{Email, Role};

    fn api(server: &MockServer) -> HttpUserApi {
        let config = AuthConfig::default().with_api_base_url(server.uri());
        HttpUserApi::new(reqwest::Client::new(), &config)
    }

    fn registration(admin_secret: Option<&str>) -> Registration {
        Registration {
            email: Email::new("ada@example.com").unwrap(),
            password: ClearTextPassword::new("secret1".to_string()).unwrap(),
            full_name: "Ada Lovelace".to_string(),
            phone_number: "123456".to_string(),
            admin_secret: admin_secret.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_profile_request_carries_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/api/profile"))
            .and(header("authorization", "Bearer tok-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "email": "ada@example.com",
                "fullName": "Ada Lovelace",
                "role": "admin"
            })))
            .mount(&server)
            .await;

        let profile = api(&server)
            .fetch_profile_at("/user/api/profile", &SecretToken::new("tok-1"))
            .await
            .unwrap();
        assert_eq!(profile.role, Role::Admin);
        assert_eq!(profile.full_name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_profile_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = api(&server)
            .fetch_profile_at("/user/api/profile", &SecretToken::new("tok-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UnexpectedStatus { status: 401 }));
    }

    #[tokio::test]
    async fn test_profile_html_body_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let err = api(&server)
            .fetch_profile_at("/user/user/profile", &SecretToken::new("tok-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Internal(_)));
    }

    #[tokio::test]
    async fn test_register_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user/api/public/register"))
            .and(body_json(serde_json::json!({
                "email": "ada@example.com",
                "password": "secret1",
                "fullName": "Ada Lovelace",
                "phoneNumber": "123456",
                "adminSecret": "s3cret"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "user": { "email": "ada@example.com", "role": "ADMIN" },
                "message": "User registered successfully"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let receipt = api(&server).register(&registration(Some("s3cret"))).await.unwrap();
        assert_eq!(receipt.message.as_deref(), Some("User registered successfully"));
        assert_eq!(receipt.profile.map(|p| p.role), Some(Role::Admin));
    }

    #[tokio::test]
    async fn test_register_rejection_surfaces_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user/api/public/register"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "User with this email already exists"
            })))
            .mount(&server)
            .await;

        let err = api(&server).register(&registration(None)).await.unwrap_err();
        match err {
            AuthError::RegistrationRejected { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("already exists"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        let config = AuthConfig::default().with_api_base_url("http://127.0.0.1:9");
        let api = HttpUserApi::new(reqwest::Client::new(), &config);
        let err = api.register(&registration(None)).await.unwrap_err();
        assert!(matches!(err, AuthError::Network(_)));
    }
}
