//! Application state

use std::ops::Deref;
use std::sync::Arc;

use warden_auth_core::AuthService;
use warden_db::pg::{PgFamilyRepository, PgPrincipalRepository};
use warden_db::DbPool;

use crate::config::Config;

/// Type alias for the auth service with concrete repository types
pub type AuthServiceImpl = AuthService<PgPrincipalRepository, PgFamilyRepository>;

/// Shared database pool wrapper for health checks
#[derive(Clone)]
pub struct SharedPool(Arc<DbPool>);

impl Deref for SharedPool {
    type Target = DbPool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Auth service for the full session lifecycle
    pub auth: Arc<AuthServiceImpl>,
    /// Database connection pool (shared reference for health checks)
    pub pool: SharedPool,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(auth: AuthServiceImpl, pool: DbPool, config: Config) -> Self {
        Self {
            auth: Arc::new(auth),
            pool: SharedPool(Arc::new(pool)),
            config: Arc::new(config),
        }
    }
}
