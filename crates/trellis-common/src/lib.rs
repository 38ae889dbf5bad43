//! # trellis-common
//!
//! Shared building blocks for Trellis services: application configuration
//! and the membership request models exchanged at the client-server boundary.

pub mod config;
pub mod models;

pub use models::{MembershipKind, MembershipRequest};
