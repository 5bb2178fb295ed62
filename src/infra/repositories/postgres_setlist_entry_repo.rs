use crate::domain::{models::setlist_entry::{NewSetlistEntry, SetlistEntry}, ports::SetlistEntryRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{types::Json, PgPool};

const ENTRY_COLUMNS: &str = "id, song_id, setlist_id, transpose, notes, arrangement, rank";

pub struct PostgresSetlistEntryRepo {
    pool: PgPool,
}

impl PostgresSetlistEntryRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SetlistEntryRepository for PostgresSetlistEntryRepo {
    async fn create_batch(&self, entries: &[NewSetlistEntry]) -> Result<Vec<SetlistEntry>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let mut created = Vec::with_capacity(entries.len());

        for entry in entries {
            let row = sqlx::query_as::<_, SetlistEntry>(&format!(
                "INSERT INTO setlist_entries (song_id, setlist_id, transpose, notes, arrangement, rank) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
                ENTRY_COLUMNS
            ))
                .bind(entry.song_id)
                .bind(entry.setlist_id)
                .bind(entry.transpose)
                .bind(&entry.notes)
                .bind(Json(&entry.arrangement))
                .bind(entry.rank)
                .fetch_one(&mut *tx)
                .await
                .map_err(AppError::Database)?;
            created.push(row);
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<SetlistEntry>, AppError> {
        sqlx::query_as::<_, SetlistEntry>(&format!("SELECT {} FROM setlist_entries WHERE id = $1", ENTRY_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<SetlistEntry>, AppError> {
        sqlx::query_as::<_, SetlistEntry>(&format!("SELECT {} FROM setlist_entries ORDER BY rank ASC, id ASC", ENTRY_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_setlists(&self, setlist_ids: &[i64]) -> Result<Vec<SetlistEntry>, AppError> {
        sqlx::query_as::<_, SetlistEntry>(&format!(
            "SELECT {} FROM setlist_entries WHERE setlist_id = ANY($1) ORDER BY rank ASC, id ASC",
            ENTRY_COLUMNS
        ))
            .bind(setlist_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_batch(&self, entries: &[SetlistEntry]) -> Result<Vec<SetlistEntry>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let mut updated = Vec::with_capacity(entries.len());

        for entry in entries {
            let row = sqlx::query_as::<_, SetlistEntry>(&format!(
                "UPDATE setlist_entries SET song_id = $1, setlist_id = $2, transpose = $3, notes = $4, arrangement = $5, rank = $6 WHERE id = $7 RETURNING {}",
                ENTRY_COLUMNS
            ))
                .bind(entry.song_id)
                .bind(entry.setlist_id)
                .bind(entry.transpose)
                .bind(&entry.notes)
                .bind(&entry.arrangement)
                .bind(entry.rank)
                .bind(entry.id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::Database)?
                .ok_or_else(|| AppError::record_not_found("id", entry.id))?;
            updated.push(row);
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn delete_batch(&self, ids: &[i64]) -> Result<(), AppError> {
        if ids.is_empty() {
            return Ok(());
        }

        sqlx::query("DELETE FROM setlist_entries WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }
}
