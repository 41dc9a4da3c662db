//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations for the client:
//! - Origin-scoped key/value storage (memory and file backed)
//! - HTTP client construction and URL/header helpers
//! - Secret wrappers (passwords, tokens) zeroized on drop
//! - Cryptographic helpers (SHA-256, Base64)
//! - Environment configuration readers

pub mod config;
pub mod crypto;
pub mod http;
pub mod secret;
pub mod storage;
