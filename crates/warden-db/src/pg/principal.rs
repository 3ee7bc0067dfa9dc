//! PostgreSQL principal repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::models::PrincipalRow;
use crate::repo::{CreatePrincipal, PrincipalRepository};

/// PostgreSQL principal repository
#[derive(Clone)]
pub struct PgPrincipalRepository {
    pool: PgPool,
}

impl PgPrincipalRepository {
    /// Create a new principal repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PrincipalRepository for PgPrincipalRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<PrincipalRow>> {
        let principal = sqlx::query_as::<_, PrincipalRow>(
            r#"
            SELECT id, role, identifier, credential_hash, active,
                   created_at, updated_at, deleted_at
            FROM principals
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(principal)
    }

    async fn find_by_identifier(
        &self,
        role: &str,
        identifier: &str,
    ) -> DbResult<Option<PrincipalRow>> {
        let principal = sqlx::query_as::<_, PrincipalRow>(
            r#"
            SELECT id, role, identifier, credential_hash, active,
                   created_at, updated_at, deleted_at
            FROM principals
            WHERE role = $1 AND identifier = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(role)
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        Ok(principal)
    }

    async fn create(&self, principal: CreatePrincipal) -> DbResult<PrincipalRow> {
        let row = sqlx::query_as::<_, PrincipalRow>(
            r#"
            INSERT INTO principals (id, role, identifier, credential_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, role, identifier, credential_hash, active,
                      created_at, updated_at, deleted_at
            "#,
        )
        .bind(principal.id)
        .bind(&principal.role)
        .bind(&principal.identifier)
        .bind(&principal.credential_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation()) {
                DbError::Conflict
            } else {
                DbError::Sqlx(e)
            }
        })?;

        Ok(row)
    }

    async fn set_active(&self, id: Uuid, active: bool) -> DbResult<()> {
        sqlx::query("UPDATE principals SET active = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(active)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> DbResult<()> {
        sqlx::query(
            "UPDATE principals SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_credential(&self, id: Uuid, credential_hash: &str) -> DbResult<()> {
        sqlx::query(
            "UPDATE principals SET credential_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(credential_hash)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
