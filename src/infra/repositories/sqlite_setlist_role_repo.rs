use crate::domain::{models::setlist_role::{NewSetlistRole, SetlistRole}, ports::SetlistRoleRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

pub struct SqliteSetlistRoleRepo {
    pool: SqlitePool,
}

impl SqliteSetlistRoleRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn select_in(&self, column: &str, ids: &[i64]) -> Result<Vec<SetlistRole>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT id, setlist_id, user_role_id FROM setlist_roles WHERE {} IN (", column));
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY id ASC");

        query.build_query_as::<SetlistRole>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}

#[async_trait]
impl SetlistRoleRepository for SqliteSetlistRoleRepo {
    async fn create_batch(&self, setlist_roles: &[NewSetlistRole]) -> Result<Vec<SetlistRole>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let mut created = Vec::with_capacity(setlist_roles.len());

        for setlist_role in setlist_roles {
            let row = sqlx::query_as::<_, SetlistRole>(
                "INSERT INTO setlist_roles (setlist_id, user_role_id) VALUES (?, ?) RETURNING id, setlist_id, user_role_id"
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
        self.select_in("id", ids).await
    }

    async fn list_by_setlists(&self, setlist_ids: &[i64]) -> Result<Vec<SetlistRole>, AppError> {
        self.select_in("setlist_id", setlist_ids).await
    }

    async fn delete_batch(&self, ids: &[i64]) -> Result<(), AppError> {
        if ids.is_empty() {
            return Ok(());
        }

        let mut query = QueryBuilder::<Sqlite>::new("DELETE FROM setlist_roles WHERE id IN (");
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        query.build()
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }
}
