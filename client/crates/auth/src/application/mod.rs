//! Application Layer
//!
//! Session resolution services and account use cases.

pub mod check_session;
pub mod config;
pub mod context;
pub mod credential_store;
pub mod identity;
pub mod notifier;
pub mod profile;
pub mod session_monitor;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;
