use crate::domain::{models::setlist::{NewSetlist, Setlist}, ports::SetlistRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

pub struct SqliteSetlistRepo {
    pool: SqlitePool,
}

impl SqliteSetlistRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SetlistRepository for SqliteSetlistRepo {
    async fn create(&self, setlist: &NewSetlist) -> Result<Setlist, AppError> {
        sqlx::query_as::<_, Setlist>(
            "INSERT INTO setlists (name, creator_id, deadline, updated_at) VALUES (?, ?, ?, ?)
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
        sqlx::query_as::<_, Setlist>("SELECT id, name, creator_id, deadline, updated_at FROM setlists WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Setlist>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new("SELECT id, name, creator_id, deadline, updated_at FROM setlists WHERE id IN (");
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY deadline ASC, id ASC");

        query.build_query_as::<Setlist>()
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
        let mut query = QueryBuilder::<Sqlite>::new("SELECT id, name, creator_id, deadline, updated_at FROM setlists WHERE 1 = 1");

        if let Some(from) = from {
            query.push(" AND deadline >= ");
            query.push_bind(from);
        }
        if let Some(to) = to {
            query.push(" AND deadline <= ");
            query.push_bind(to);
        }
        query.push(" ORDER BY deadline ASC, id ASC");

        query.build_query_as::<Setlist>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, setlist: &Setlist) -> Result<Setlist, AppError> {
        sqlx::query_as::<_, Setlist>(
            "UPDATE setlists SET name = ?, creator_id = ?, deadline = ?, updated_at = ? WHERE id = ?
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
        let result = sqlx::query("DELETE FROM setlists WHERE id = ?")
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
