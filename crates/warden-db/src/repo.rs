//! Repository traits
//!
//! Define async repository interfaces for the credential store and the
//! revocation ledger. The ledger's `advance` is the single
//! compare-and-swap that serializes rotations within a token family.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::*;

/// Credential store contract
///
/// Principal writes beyond `create` belong to external profile-management
/// collaborators; the auth core itself is read-mostly here.
#[async_trait]
pub trait PrincipalRepository: Send + Sync {
    /// Find a principal by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<PrincipalRow>>;

    /// Find a non-deleted principal by (role, identifier)
    async fn find_by_identifier(
        &self,
        role: &str,
        identifier: &str,
    ) -> DbResult<Option<PrincipalRow>>;

    /// Create a new principal
    ///
    /// Fails with [`crate::DbError::Conflict`] when (role, identifier)
    /// already exists among non-deleted principals.
    async fn create(&self, principal: CreatePrincipal) -> DbResult<PrincipalRow>;

    /// Set the active flag
    async fn set_active(&self, id: Uuid, active: bool) -> DbResult<()>;

    /// Soft-delete a principal, making it ineligible for new sessions
    async fn soft_delete(&self, id: Uuid) -> DbResult<()>;

    /// Replace the stored credential hash
    async fn update_credential(&self, id: Uuid, credential_hash: &str) -> DbResult<()>;
}

/// Create principal input
#[derive(Debug, Clone)]
pub struct CreatePrincipal {
    pub id: Uuid,
    pub role: String,
    pub identifier: String,
    pub credential_hash: String,
}

/// Revocation ledger contract
///
/// One row per token family; the only mutable contended state in the
/// subsystem.
#[async_trait]
pub trait FamilyRepository: Send + Sync {
    /// Register a new family
    async fn create(&self, family: CreateFamily) -> DbResult<FamilyRow>;

    /// Fetch a family by ID
    async fn get(&self, id: Uuid) -> DbResult<Option<FamilyRow>>;

    /// Atomically advance the family's sequence
    ///
    /// Compare-and-swap semantics: succeeds only if the current `next_seq`
    /// equals `expected_seq` and the family is not revoked, then increments.
    /// Returns whether the swap happened. Two concurrent rotations of the
    /// same token see exactly one `true`.
    async fn advance(&self, id: Uuid, expected_seq: i64) -> DbResult<bool>;

    /// Mark a family permanently revoked
    async fn revoke(&self, id: Uuid) -> DbResult<()>;

    /// Revoke every family belonging to a principal
    async fn revoke_all_for_principal(&self, principal_id: Uuid) -> DbResult<u64>;

    /// Delete families past their refresh ceiling
    ///
    /// Maintenance sweep only; expiry is enforced lazily at verification
    /// time regardless.
    async fn delete_expired(&self) -> DbResult<u64>;
}

/// Create family input
#[derive(Debug, Clone)]
pub struct CreateFamily {
    pub id: Uuid,
    pub principal_id: Uuid,
    pub refreshable_until: DateTime<Utc>,
}
