//! Infrastructure Layer
//!
//! HTTP adapters for the identity provider and the user service, plus
//! in-memory stand-ins for development and tests.

pub mod identity_toolkit;
pub mod memory;
pub mod user_api;
