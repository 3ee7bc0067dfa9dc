//! PostgreSQL repository implementations

mod family;
mod principal;

pub use family::PgFamilyRepository;
pub use principal::PgPrincipalRepository;

use crate::DbPool;

/// All repositories bundled together
#[derive(Clone)]
pub struct Repositories {
    pub principals: PgPrincipalRepository,
    pub families: PgFamilyRepository,
}

impl Repositories {
    /// Create all repositories from a database pool
    pub fn new(pool: DbPool) -> Self {
        Self {
            principals: PgPrincipalRepository::new(pool.clone()),
            families: PgFamilyRepository::new(pool),
        }
    }
}
