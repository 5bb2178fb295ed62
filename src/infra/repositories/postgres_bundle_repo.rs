use crate::domain::{models::bundle::{Bundle, NewBundle}, ports::BundleRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

pub struct PostgresBundleRepo {
    pool: PgPool,
}

impl PostgresBundleRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BundleRepository for PostgresBundleRepo {
    async fn create(&self, bundle: &NewBundle) -> Result<Bundle, AppError> {
        sqlx::query_as::<_, Bundle>(
            "INSERT INTO bundles (name, parent_id) VALUES ($1, $2) RETURNING id, name, parent_id"
        )
            .bind(&bundle.name)
            .bind(bundle.parent_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Bundle>, AppError> {
        sqlx::query_as::<_, Bundle>("SELECT id, name, parent_id FROM bundles WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Bundle>, AppError> {
        sqlx::query_as::<_, Bundle>("SELECT id, name, parent_id FROM bundles WHERE deleted_at IS NULL ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_leaves(&self) -> Result<Vec<Bundle>, AppError> {
        sqlx::query_as::<_, Bundle>(
            "SELECT b.id, b.name, b.parent_id FROM bundles b
             WHERE b.deleted_at IS NULL
               AND NOT EXISTS (SELECT 1 FROM bundles c WHERE c.parent_id = b.id AND c.deleted_at IS NULL)
             ORDER BY b.id ASC"
        )
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, bundle: &Bundle) -> Result<Bundle, AppError> {
        sqlx::query_as::<_, Bundle>(
            "UPDATE bundles SET name = $1, parent_id = $2 WHERE id = $3 AND deleted_at IS NULL RETURNING id, name, parent_id"
        )
            .bind(&bundle.name)
            .bind(bundle.parent_id)
            .bind(bundle.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::record_not_found("id", bundle.id))
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE bundles SET deleted_at = $1 WHERE id = $2 AND deleted_at IS NULL")
            .bind(Utc::now())
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
