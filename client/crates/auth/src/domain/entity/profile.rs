//! Profile Entity

use chrono::NaiveDateTime;

use crate::domain::value_object::Role;

/// Display name used when the profile could not be fetched
pub const FALLBACK_FULL_NAME: &str = "User";

/// Account details owned by the user service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: Option<String>,
    /// Identity provider uid the account is linked to
    pub firebase_uid: Option<String>,
    pub email: Option<String>,
    pub full_name: String,
    pub phone_number: Option<String>,
    pub role: Role,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    /// Synthesized locally because every profile endpoint failed
    pub degraded: bool,
}

impl Profile {
    /// Degraded profile built from whatever the client still knows
    pub fn fallback(email: Option<String>, full_name: &str) -> Self {
        Self {
            id: None,
            firebase_uid: None,
            email,
            full_name: full_name.to_string(),
            phone_number: None,
            role: Role::User,
            created_at: None,
            updated_at: None,
            degraded: true,
        }
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
