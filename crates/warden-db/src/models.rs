//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Principal row from the database
#[derive(Debug, Clone, FromRow)]
pub struct PrincipalRow {
    pub id: Uuid,
    pub role: String,
    pub identifier: String,
    pub credential_hash: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl PrincipalRow {
    /// Convert to domain PrincipalId
    pub fn principal_id(&self) -> warden_types::PrincipalId {
        warden_types::PrincipalId(self.id)
    }

    /// Whether this principal may hold or refresh sessions
    ///
    /// Soft-deleted and deactivated principals fail verification even when
    /// their tokens are still cryptographically valid.
    pub fn is_eligible(&self) -> bool {
        self.active && self.deleted_at.is_none()
    }
}

/// Token family row from the database (one revocation record per family)
#[derive(Debug, Clone, FromRow)]
pub struct FamilyRow {
    pub id: Uuid,
    pub principal_id: Uuid,
    /// Sequence number the next-minted refresh token will carry.
    /// A presented token with sequence `n` is current iff `n + 1 == next_seq`.
    pub next_seq: i64,
    pub refreshable_until: DateTime<Utc>,
    pub revoked: bool,
    pub revoked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl FamilyRow {
    /// Convert to domain FamilyId
    pub fn family_id(&self) -> warden_types::FamilyId {
        warden_types::FamilyId(self.id)
    }

    /// Whether the family's refresh ceiling has lapsed
    pub fn is_past_ceiling(&self, now: DateTime<Utc>) -> bool {
        now >= self.refreshable_until
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(active: bool, deleted: bool) -> PrincipalRow {
        PrincipalRow {
            id: Uuid::new_v4(),
            role: "member".to_string(),
            identifier: "a@x.com".to_string(),
            credential_hash: "hash".to_string(),
            active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: deleted.then(Utc::now),
        }
    }

    #[test]
    fn test_principal_eligibility() {
        assert!(principal(true, false).is_eligible());
        assert!(!principal(false, false).is_eligible());
        assert!(!principal(true, true).is_eligible());
        assert!(!principal(false, true).is_eligible());
    }

    #[test]
    fn test_family_ceiling() {
        let family = FamilyRow {
            id: Uuid::new_v4(),
            principal_id: Uuid::new_v4(),
            next_seq: 1,
            refreshable_until: Utc::now() + chrono::Duration::days(7),
            revoked: false,
            revoked_at: None,
            created_at: Utc::now(),
        };
        assert!(!family.is_past_ceiling(Utc::now()));
        assert!(family.is_past_ceiling(Utc::now() + chrono::Duration::days(8)));
    }
}
