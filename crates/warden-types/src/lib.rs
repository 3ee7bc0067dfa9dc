//! Warden Types - Shared domain types
//!
//! This crate contains domain types used across Warden services:
//! - Principal identity and role tags
//! - Token family identifiers
//! - The session pair returned by issuance and rotation

pub mod principal;
pub mod role;
pub mod session;

pub use principal::*;
pub use role::*;
pub use session::*;
