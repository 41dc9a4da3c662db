use derive_more::Display;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Authorization role reported by the user service
///
/// Parsing is total: anything that is not some casing of `admin` is a
/// plain user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum Role {
    #[default]
    #[display("USER")]
    User,
    #[display("ADMIN")]
    Admin,
}

impl Role {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    #[inline]
    pub fn from_code(code: &str) -> Self {
        if code.eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::User
        }
    }

    /// Absent role on the wire means `User`
    #[inline]
    pub fn from_wire(code: Option<&str>) -> Self {
        code.map(Self::from_code).unwrap_or_default()
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = Option::<String>::deserialize(deserializer)?;
        Ok(Self::from_wire(code.as_deref()))
    }
}
