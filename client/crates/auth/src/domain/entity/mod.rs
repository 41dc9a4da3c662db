pub mod credential;
pub mod identity;
pub mod profile;
pub mod registration;
pub mod session;

pub use credential::Credential;
pub use identity::{Identity, IdentityEvent};
pub use profile::Profile;
pub use registration::{Registration, RegistrationReceipt};
pub use session::{Session, SessionPhase, SessionTracker};
