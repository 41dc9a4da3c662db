//! Registration Entity

use platform::secret::ClearTextPassword;

use crate::domain::entity::profile::Profile;
use crate::domain::value_object::Email;

/// Validated account creation request
#[derive(Debug)]
pub struct Registration {
    pub email: Email,
    pub password: ClearTextPassword,
    pub full_name: String,
    pub phone_number: String,
    /// Present only when the caller typed a non-blank secret
    pub admin_secret: Option<String>,
}

/// What the user service returned for a successful registration
#[derive(Debug, Clone, Default)]
pub struct RegistrationReceipt {
    pub message: Option<String>,
    pub profile: Option<Profile>,
}
