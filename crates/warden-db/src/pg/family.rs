//! PostgreSQL token family repository implementation
//!
//! The `advance` conditional update is the serialization point for all
//! rotations within one family.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::FamilyRow;
use crate::repo::{CreateFamily, FamilyRepository};

/// PostgreSQL token family repository
#[derive(Clone)]
pub struct PgFamilyRepository {
    pool: PgPool,
}

impl PgFamilyRepository {
    /// Create a new family repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FamilyRepository for PgFamilyRepository {
    async fn create(&self, family: CreateFamily) -> DbResult<FamilyRow> {
        let row = sqlx::query_as::<_, FamilyRow>(
            r#"
            INSERT INTO token_families (id, principal_id, refreshable_until)
            VALUES ($1, $2, $3)
            RETURNING id, principal_id, next_seq, refreshable_until,
                      revoked, revoked_at, created_at
            "#,
        )
        .bind(family.id)
        .bind(family.principal_id)
        .bind(family.refreshable_until)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get(&self, id: Uuid) -> DbResult<Option<FamilyRow>> {
        let family = sqlx::query_as::<_, FamilyRow>(
            r#"
            SELECT id, principal_id, next_seq, refreshable_until,
                   revoked, revoked_at, created_at
            FROM token_families
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(family)
    }

    async fn advance(&self, id: Uuid, expected_seq: i64) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE token_families
            SET next_seq = next_seq + 1
            WHERE id = $1 AND next_seq = $2 AND NOT revoked
            "#,
        )
        .bind(id)
        .bind(expected_seq)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn revoke(&self, id: Uuid) -> DbResult<()> {
        sqlx::query(
            "UPDATE token_families SET revoked = TRUE, revoked_at = NOW() \
             WHERE id = $1 AND NOT revoked",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn revoke_all_for_principal(&self, principal_id: Uuid) -> DbResult<u64> {
        let result = sqlx::query(
            "UPDATE token_families SET revoked = TRUE, revoked_at = NOW() \
             WHERE principal_id = $1 AND NOT revoked",
        )
        .bind(principal_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_expired(&self) -> DbResult<u64> {
        let result =
            sqlx::query("DELETE FROM token_families WHERE refreshable_until < NOW()")
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }
}
