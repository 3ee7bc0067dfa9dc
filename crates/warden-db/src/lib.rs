//! Warden DB - Database abstractions
//!
//! SQLx-based persistence layer behind the two storage contracts the auth
//! core consumes: the credential store ([`PrincipalRepository`]) and the
//! revocation ledger ([`FamilyRepository`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use warden_db::{create_pool, Repositories};
//!
//! let pool = create_pool("postgres://localhost/warden").await?;
//! let repos = Repositories::new(pool);
//!
//! let principal = repos
//!     .principals
//!     .find_by_identifier(&role, "user@example.com")
//!     .await?;
//! ```

pub mod error;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use error::{DbError, DbResult};
pub use models::*;
pub use pg::Repositories;
pub use pool::{create_pool, DbPool};
pub use repo::*;
