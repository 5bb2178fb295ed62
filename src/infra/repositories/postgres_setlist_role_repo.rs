use crate::domain::{models::setlist_role::{NewSetlistRole, SetlistRole}, ports::SetlistRoleRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresSetlistRoleRepo {
    pool: PgPool,
}

impl PostgresSetlistRoleRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SetlistRoleRepository for PostgresSetlistRoleRepo {
    async fn create_batch(&self, setlist_roles: &[NewSetlistRole]) -> Result<Vec<SetlistRole>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let mut created = Vec::with_capacity(setlist_roles.len());

        for setlist_role in setlist_roles {
            let row = sqlx::query_as::<_, SetlistRole>(
                "INSERT INTO setlist_roles (setlist_id, user_role_id) VALUES ($1, $2) RETURNING id, setlist_id, user_role_id"
            )
                .bind(setlist_role.setlist_id)
                .bind(setlist_role.user_role_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(AppError::Database)?;
            created.push(row);
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<SetlistRole>, AppError> {
        sqlx::query_as::<_, SetlistRole>("SELECT id, setlist_id, user_role_id FROM setlist_roles WHERE id = ANY($1) ORDER BY id ASC")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_setlists(&self, setlist_ids: &[i64]) -> Result<Vec<SetlistRole>, AppError> {
        sqlx::query_as::<_, SetlistRole>("SELECT id, setlist_id, user_role_id FROM setlist_roles WHERE setlist_id = ANY($1) ORDER BY id ASC")
            .bind(setlist_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete_batch(&self, ids: &[i64]) -> Result<(), AppError> {
        if ids.is_empty() {
            return Ok(());
        }

        sqlx::query("DELETE FROM setlist_roles WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }
}
