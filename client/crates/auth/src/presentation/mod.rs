//! Presentation Layer
//!
//! Route gates, the route table and wire DTOs.

pub mod dto;
pub mod gate;
pub mod guard;
pub mod router;
