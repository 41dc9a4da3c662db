//! Auth (Session & Authorization) Client Module
//!
//! Clean Architecture structure:
//! - `domain/` - Identity, profile and session types, ports to external services
//! - `application/` - Session resolution services and account use cases
//! - `infra/` - HTTP adapters and in-memory stand-ins
//! - `presentation/` - Route gates, route table, wire DTOs
//!
//! ## Features
//! - Sign in / sign out against an identity-toolkit style provider
//! - Sequenced identity-change notifications (latest event wins)
//! - Multi-endpoint profile discovery with a degraded fallback profile
//! - Route gates for signed-in and admin-only views, failing closed
//!
//! ## Session Model
//! - Token and email persisted per origin (`userToken`, `userEmail`)
//! - Cache-then-confirm: a stored token counts until an identity event says otherwise
//! - Roles are fetched fresh on every check, never cached

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::context::SessionContext;
pub use error::{AuthError, AuthResult};
pub use infra::identity_toolkit::{HttpIdentityBackend, IdentityToolkitConfig};
pub use infra::user_api::HttpUserApi;
pub use presentation::router::{AppRouter, Navigation};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod guard {
    pub use crate::presentation::guard::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod usecase {
    pub use crate::application::sign_in::{SignInInput, SignInOutput, SignInUseCase};
    pub use crate::application::sign_out::{SignOutOutput, SignOutUseCase};
    pub use crate::application::sign_up::{RegisterUseCase, SignUpInput, SignUpOutput};
}
