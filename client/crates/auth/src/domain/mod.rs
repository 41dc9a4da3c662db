//! Domain Layer
//!
//! Identity, profile and session types plus the ports to external services.

pub mod entity;
pub mod repository;
pub mod value_object;
