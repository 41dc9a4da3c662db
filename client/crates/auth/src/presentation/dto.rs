//! API DTOs (Data Transfer Objects)
//!
//! Wire shapes of the user service. Every profile field is optional on the
//! wire; missing values become defaults instead of decode failures.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::entity::{Profile, Registration, RegistrationReceipt};
use crate::domain::value_object::Role;

// ============================================================================
// Profile
// ============================================================================

/// Profile response body
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileDto {
    pub id: Option<String>,
    pub firebase_uid: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub role: Role,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl ProfileDto {
    /// Decode a profile body
    ///
    /// Some deployments return the profile JSON as a JSON string; that extra
    /// layer is unwrapped.
    pub fn from_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        match serde_json::from_slice::<serde_json::Value>(body)? {
            serde_json::Value::String(inner) => serde_json::from_str(&inner),
            value => serde_json::from_value(value),
        }
    }

    pub fn into_profile(self) -> Profile {
        Profile {
            id: self.id,
            firebase_uid: self.firebase_uid,
            email: self.email,
            full_name: self.full_name.unwrap_or_default(),
            phone_number: self.phone_number,
            role: self.role,
            created_at: self.created_at.as_deref().and_then(parse_timestamp),
            updated_at: self.updated_at.as_deref().and_then(parse_timestamp),
            degraded: false,
        }
    }
}

/// ISO local date-time, or RFC 3339 converted to UTC
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    raw.parse::<NaiveDateTime>()
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_utc()))
}

// ============================================================================
// Registration
// ============================================================================

/// Registration request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub full_name: &'a str,
    pub phone_number: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_secret: Option<&'a str>,
}

impl<'a> From<&'a Registration> for RegisterRequest<'a> {
    fn from(registration: &'a Registration) -> Self {
        Self {
            email: registration.email.as_str(),
            password: registration.password.expose(),
            full_name: &registration.full_name,
            phone_number: &registration.phone_number,
            admin_secret: registration.admin_secret.as_deref(),
        }
    }
}

/// Registration success body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterResponse {
    pub user: Option<ProfileDto>,
    pub message: Option<String>,
}

impl From<RegisterResponse> for RegistrationReceipt {
    fn from(response: RegisterResponse) -> Self {
        Self {
            message: response.message,
            profile: response.user.map(ProfileDto::into_profile),
        }
    }
}

/// Error body used by the user service
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_decoding() {
        let body = br#"{
            "id": "665f1c",
            "firebaseUid": "uid-ada",
            "email": "ada@example.com",
            "fullName": "Ada Lovelace",
            "phoneNumber": "+44 20 7946 0000",
            "role": "ADMIN",
            "createdAt": "2024-03-01T10:15:30.123",
            "updatedAt": "2024-03-02T08:00:00Z"
        }"#;
        let profile = ProfileDto::from_body(body).unwrap().into_profile();
        assert_eq!(profile.role, Role::Admin);
        assert_eq!(profile.full_name, "Ada Lovelace");
        assert_eq!(profile.firebase_uid.as_deref(), Some("uid-ada"));
        assert!(profile.created_at.is_some());
        assert!(profile.updated_at.is_some());
        assert!(!profile.degraded);
    }

    #[test]
    fn test_sparse_profile_defaults_to_user() {
        let profile = ProfileDto::from_body(br#"{"email":"ada@example.com"}"#)
            .unwrap()
            .into_profile();
        assert_eq!(profile.role, Role::User);
        assert_eq!(profile.full_name, "");

        let profile = ProfileDto::from_body(br#"{"role":"superuser","createdAt":"yesterday"}"#)
            .unwrap()
            .into_profile();
        assert_eq!(profile.role, Role::User);
        assert_eq!(profile.created_at, None);
    }

    #[test]
    fn test_string_wrapped_profile() {
        let body = serde_json::to_vec(&r#"{"email":"ada@example.com","role":"admin"}"#).unwrap();
        let profile = ProfileDto::from_body(&body).unwrap().into_profile();
        assert_eq!(profile.role, Role::Admin);
    }

    #[test]
    fn test_non_json_body_is_an_error() {
        assert!(ProfileDto::from_body(b"<html>login</html>").is_err());
        assert!(ProfileDto::from_body(b"[1,2]").is_err());
    }

    #[test]
    fn test_register_request_omits_missing_admin_secret() {
        let request = RegisterRequest {
            email: "ada@example.com",
            password: "secret1",
            full_name: "Ada",
            phone_number: "123",
            admin_secret: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["fullName"], "Ada");
        assert_eq!(json["phoneNumber"], "123");
        assert!(json.get("adminSecret").is_none());
    }
}
