//! HTTP handlers

mod auth;
mod health;

pub use auth::{login, logout, logout_all, me, refresh, register};
pub use health::{health, ready};
