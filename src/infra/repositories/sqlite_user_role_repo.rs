use crate::domain::{models::user_role::{NewUserRole, UserRole}, ports::UserRoleRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

pub struct SqliteUserRoleRepo {
    pool: SqlitePool,
}

impl SqliteUserRoleRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRoleRepository for SqliteUserRoleRepo {
    async fn create_batch(&self, user_roles: &[NewUserRole]) -> Result<Vec<UserRole>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let mut created = Vec::with_capacity(user_roles.len());

        for user_role in user_roles {
            let row = sqlx::query_as::<_, UserRole>(
                "INSERT INTO user_roles (user_id, role_id, active) VALUES (?, ?, ?) RETURNING id, user_id, role_id, active"
            )
                .bind(user_role.user_id)
                .bind(user_role.role_id)
                .bind(user_role.active)
                .fetch_one(&mut *tx)
                .await
                .map_err(AppError::Database)?;
            created.push(row);
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<UserRole>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new("SELECT id, user_id, role_id, active FROM user_roles WHERE id IN (");
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY id ASC");

        query.build_query_as::<UserRole>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<UserRole>, AppError> {
        sqlx::query_as::<_, UserRole>("SELECT id, user_id, role_id, active FROM user_roles ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<UserRole>, AppError> {
        sqlx::query_as::<_, UserRole>("SELECT id, user_id, role_id, active FROM user_roles WHERE user_id = ? ORDER BY id ASC")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_batch(&self, user_roles: &[UserRole]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        for user_role in user_roles {
            let result = sqlx::query("UPDATE user_roles SET active = ? WHERE id = ?")
                .bind(user_role.active)
                .bind(user_role.id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;

            if result.rows_affected() == 0 {
                return Err(AppError::record_not_found("id", user_role.id));
            }
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn delete_by_user(&self, user_id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM user_roles WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn delete_by_role(&self, role_id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM user_roles WHERE role_id = ?")
            .bind(role_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }
}
