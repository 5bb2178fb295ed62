use crate::domain::{models::role::{NewRole, Role}, ports::RoleRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresRoleRepo {
    pool: PgPool,
}

impl PostgresRoleRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for PostgresRoleRepo {
    async fn create(&self, role: &NewRole) -> Result<Role, AppError> {
        sqlx::query_as::<_, Role>(
            "INSERT INTO roles (name, description) VALUES ($1, $2) RETURNING id, name, description"
        )
            .bind(&role.name)
            .bind(&role.description)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Role>, AppError> {
        sqlx::query_as::<_, Role>("SELECT id, name, description FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Role>, AppError> {
        sqlx::query_as::<_, Role>("SELECT id, name, description FROM roles ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, role: &Role) -> Result<Role, AppError> {
        sqlx::query_as::<_, Role>(
            "UPDATE roles SET name = $1, description = $2 WHERE id = $3 RETURNING id, name, description"
        )
            .bind(&role.name)
            .bind(&role.description)
            .bind(role.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::record_not_found("id", role.id))
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::record_not_found("id", id));
        }
        Ok(())
    }
}
