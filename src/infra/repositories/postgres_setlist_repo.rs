use crate::domain::{models::setlist::{NewSetlist, Setlist}, ports::SetlistRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresSetlistRepo {
    pool: PgPool,
}

impl PostgresSetlistRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SetlistRepository for PostgresSetlistRepo {
    async fn create(&self, setlist: &NewSetlist) -> Result<Setlist, AppError> {
        sqlx::query_as::<_, Setlist>(
            "INSERT INTO setlists (name, creator_id, deadline, updated_at) VALUES ($1, $2, $3, $4)
             RETURNING id, name, creator_id, deadline, updated_at"
        )
            .bind(&setlist.name)
            .bind(setlist.creator_id)
            .bind(setlist.deadline)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Setlist>, AppError> {
        sqlx::query_as::<_, Setlist>("SELECT id, name, creator_id, deadline, updated_at FROM setlists WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Setlist>, AppError> {
        sqlx::query_as::<_, Setlist>(
            "SELECT id, name, creator_id, deadline, updated_at FROM setlists WHERE id = ANY($1) ORDER BY deadline ASC, id ASC"
        )
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Setlist>, AppError> {
        sqlx::query_as::<_, Setlist>("SELECT id, name, creator_id, deadline, updated_at FROM setlists ORDER BY deadline ASC, id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_timeframe(&self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Result<Vec<Setlist>, AppError> {
        sqlx::query_as::<_, Setlist>(
            "SELECT id, name, creator_id, deadline, updated_at FROM setlists
             WHERE ($1::timestamptz IS NULL OR deadline >= $1)
               AND ($2::timestamptz IS NULL OR deadline <= $2)
             ORDER BY deadline ASC, id ASC"
        )
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, setlist: &Setlist) -> Result<Setlist, AppError> {
        sqlx::query_as::<_, Setlist>(
            "UPDATE setlists SET name = $1, creator_id = $2, deadline = $3, updated_at = $4 WHERE id = $5
             RETURNING id, name, creator_id, deadline, updated_at"
        )
            .bind(&setlist.name)
            .bind(setlist.creator_id)
            .bind(setlist.deadline)
            .bind(Utc::now())
            .bind(setlist.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::record_not_found("id", setlist.id))
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM setlists WHERE id = $1")
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
