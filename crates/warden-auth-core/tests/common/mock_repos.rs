//! Mock repositories for testing
//!
//! In-memory implementations of the credential store and revocation ledger.
//! The family mock keeps the ledger's compare-and-swap semantics faithful:
//! `advance` mutates under the map's shard lock, so concurrent rotations see
//! exactly one winner, same as the conditional UPDATE in Postgres.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use warden_db::{
    CreateFamily, CreatePrincipal, DbError, DbResult, FamilyRepository, FamilyRow,
    PrincipalRepository, PrincipalRow,
};

/// In-memory principal repository for testing
#[derive(Default, Clone)]
pub struct MockPrincipalRepository {
    principals: Arc<DashMap<Uuid, PrincipalRow>>,
}

impl MockPrincipalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a principal row directly
    #[allow(dead_code)]
    pub fn insert_principal(&self, principal: PrincipalRow) {
        self.principals.insert(principal.id, principal);
    }
}

#[async_trait]
impl PrincipalRepository for MockPrincipalRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<PrincipalRow>> {
        Ok(self.principals.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_identifier(
        &self,
        role: &str,
        identifier: &str,
    ) -> DbResult<Option<PrincipalRow>> {
        Ok(self
            .principals
            .iter()
            .find(|r| {
                r.role == role && r.identifier == identifier && r.deleted_at.is_none()
            })
            .map(|r| r.value().clone()))
    }

    async fn create(&self, principal: CreatePrincipal) -> DbResult<PrincipalRow> {
        let taken = self.principals.iter().any(|r| {
            r.role == principal.role
                && r.identifier == principal.identifier
                && r.deleted_at.is_none()
        });
        if taken {
            return Err(DbError::Conflict);
        }

        let row = PrincipalRow {
            id: principal.id,
            role: principal.role,
            identifier: principal.identifier,
            credential_hash: principal.credential_hash,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        };
        self.principals.insert(row.id, row.clone());
        Ok(row)
    }

    async fn set_active(&self, id: Uuid, active: bool) -> DbResult<()> {
        if let Some(mut p) = self.principals.get_mut(&id) {
            p.active = active;
            p.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> DbResult<()> {
        if let Some(mut p) = self.principals.get_mut(&id) {
            if p.deleted_at.is_none() {
                p.deleted_at = Some(Utc::now());
                p.updated_at = Utc::now();
            }
        }
        Ok(())
    }

    async fn update_credential(&self, id: Uuid, credential_hash: &str) -> DbResult<()> {
        if let Some(mut p) = self.principals.get_mut(&id) {
            p.credential_hash = credential_hash.to_string();
            p.updated_at = Utc::now();
        }
        Ok(())
    }
}

/// In-memory token family repository for testing
#[derive(Default, Clone)]
pub struct MockFamilyRepository {
    families: Arc<DashMap<Uuid, FamilyRow>>,
}

impl MockFamilyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// IDs of every registered family
    #[allow(dead_code)]
    pub fn family_ids(&self) -> Vec<Uuid> {
        self.families.iter().map(|r| r.id).collect()
    }

    /// Snapshot a family row
    #[allow(dead_code)]
    pub fn snapshot(&self, id: Uuid) -> Option<FamilyRow> {
        self.families.get(&id).map(|r| r.value().clone())
    }

    /// Rewrite a family's ceiling, e.g. to simulate lapse without sleeping
    #[allow(dead_code)]
    pub fn force_ceiling(&self, id: Uuid, at: DateTime<Utc>) {
        if let Some(mut f) = self.families.get_mut(&id) {
            f.refreshable_until = at;
        }
    }
}

#[async_trait]
impl FamilyRepository for MockFamilyRepository {
    async fn create(&self, family: CreateFamily) -> DbResult<FamilyRow> {
        let row = FamilyRow {
            id: family.id,
            principal_id: family.principal_id,
            next_seq: 1,
            refreshable_until: family.refreshable_until,
            revoked: false,
            revoked_at: None,
            created_at: Utc::now(),
        };
        self.families.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get(&self, id: Uuid) -> DbResult<Option<FamilyRow>> {
        Ok(self.families.get(&id).map(|r| r.value().clone()))
    }

    async fn advance(&self, id: Uuid, expected_seq: i64) -> DbResult<bool> {
        // get_mut holds the shard lock for the whole compare-and-increment
        match self.families.get_mut(&id) {
            Some(mut f) if f.next_seq == expected_seq && !f.revoked => {
                f.next_seq += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke(&self, id: Uuid) -> DbResult<()> {
        if let Some(mut f) = self.families.get_mut(&id) {
            if !f.revoked {
                f.revoked = true;
                f.revoked_at = Some(Utc::now());
            }
        }
        Ok(())
    }

    async fn revoke_all_for_principal(&self, principal_id: Uuid) -> DbResult<u64> {
        let mut count = 0;
        for mut f in self.families.iter_mut() {
            if f.principal_id == principal_id && !f.revoked {
                f.revoked = true;
                f.revoked_at = Some(Utc::now());
                count += 1;
            }
        }
        Ok(count)
    }

    async fn delete_expired(&self) -> DbResult<u64> {
        let now = Utc::now();
        let expired: Vec<Uuid> = self
            .families
            .iter()
            .filter(|r| r.refreshable_until < now)
            .map(|r| r.id)
            .collect();
        let count = expired.len() as u64;
        for id in expired {
            self.families.remove(&id);
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_family_input(principal_id: Uuid) -> CreateFamily {
        CreateFamily {
            id: Uuid::new_v4(),
            principal_id,
            refreshable_until: Utc::now() + chrono::Duration::days(7),
        }
    }

    #[tokio::test]
    async fn test_mock_principal_repo_crud() {
        let repo = MockPrincipalRepository::new();

        let created = repo
            .create(CreatePrincipal {
                id: Uuid::new_v4(),
                role: "member".to_string(),
                identifier: "a@x.com".to_string(),
                credential_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        assert!(created.is_eligible());

        let found = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.identifier, "a@x.com");

        let found = repo.find_by_identifier("member", "a@x.com").await.unwrap();
        assert!(found.is_some());

        // Different role, same identifier: not found
        let found = repo.find_by_identifier("admin", "a@x.com").await.unwrap();
        assert!(found.is_none());

        repo.set_active(created.id, false).await.unwrap();
        assert!(!repo.find_by_id(created.id).await.unwrap().unwrap().is_eligible());

        repo.set_active(created.id, true).await.unwrap();
        repo.soft_delete(created.id).await.unwrap();
        let deleted = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert!(deleted.deleted_at.is_some());
        assert!(!deleted.is_eligible());

        // Soft-deleted rows are invisible to identifier lookup
        let found = repo.find_by_identifier("member", "a@x.com").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_mock_principal_repo_conflict() {
        let repo = MockPrincipalRepository::new();

        let input = CreatePrincipal {
            id: Uuid::new_v4(),
            role: "member".to_string(),
            identifier: "dup@x.com".to_string(),
            credential_hash: "hash".to_string(),
        };
        repo.create(input.clone()).await.unwrap();

        let second = CreatePrincipal {
            id: Uuid::new_v4(),
            ..input
        };
        assert!(matches!(repo.create(second).await, Err(DbError::Conflict)));
    }

    #[tokio::test]
    async fn test_advance_cas_single_winner() {
        let repo = MockFamilyRepository::new();
        let family = repo.create(create_family_input(Uuid::new_v4())).await.unwrap();
        assert_eq!(family.next_seq, 1);

        // First swap wins, the replayed one loses
        assert!(repo.advance(family.id, 1).await.unwrap());
        assert!(!repo.advance(family.id, 1).await.unwrap());
        assert!(repo.advance(family.id, 2).await.unwrap());

        assert_eq!(repo.snapshot(family.id).unwrap().next_seq, 3);
    }

    #[tokio::test]
    async fn test_advance_refuses_revoked_family() {
        let repo = MockFamilyRepository::new();
        let family = repo.create(create_family_input(Uuid::new_v4())).await.unwrap();

        repo.revoke(family.id).await.unwrap();
        assert!(!repo.advance(family.id, 1).await.unwrap());

        let row = repo.snapshot(family.id).unwrap();
        assert!(row.revoked);
        assert!(row.revoked_at.is_some());
    }

    #[tokio::test]
    async fn test_revoke_all_for_principal() {
        let repo = MockFamilyRepository::new();
        let principal_id = Uuid::new_v4();

        for _ in 0..3 {
            repo.create(create_family_input(principal_id)).await.unwrap();
        }
        repo.create(create_family_input(Uuid::new_v4())).await.unwrap();

        let revoked = repo.revoke_all_for_principal(principal_id).await.unwrap();
        assert_eq!(revoked, 3);

        // Second sweep finds nothing live
        let revoked = repo.revoke_all_for_principal(principal_id).await.unwrap();
        assert_eq!(revoked, 0);
    }

    #[tokio::test]
    async fn test_delete_expired() {
        let repo = MockFamilyRepository::new();
        let keep = repo.create(create_family_input(Uuid::new_v4())).await.unwrap();
        let lapsed = repo.create(create_family_input(Uuid::new_v4())).await.unwrap();
        repo.force_ceiling(lapsed.id, Utc::now() - chrono::Duration::hours(1));

        assert_eq!(repo.delete_expired().await.unwrap(), 1);
        assert!(repo.get(lapsed.id).await.unwrap().is_none());
        assert!(repo.get(keep.id).await.unwrap().is_some());
    }
}
