use crate::domain::{models::song::{NewSong, Song, SongFilter}, ports::SongRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{types::Json, PgPool, Postgres, QueryBuilder};

const SONG_COLUMNS: &str = "id, bundle_id, creator_id, title, subtitle, song_key, bpm, chord_sheet, updated_at";

pub struct PostgresSongRepo {
    pool: PgPool,
}

impl PostgresSongRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SongRepository for PostgresSongRepo {
    async fn create(&self, song: &NewSong) -> Result<Song, AppError> {
        sqlx::query_as::<_, Song>(&format!(
            "INSERT INTO songs (bundle_id, creator_id, title, subtitle, song_key, bpm, chord_sheet, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {}",
            SONG_COLUMNS
        ))
            .bind(song.bundle_id)
            .bind(song.creator_id)
            .bind(&song.title)
            .bind(&song.subtitle)
            .bind(&song.key)
            .bind(song.bpm)
            .bind(Json(&song.chord_sheet))
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Song>, AppError> {
        sqlx::query_as::<_, Song>(&format!("SELECT {} FROM songs WHERE id = $1 AND deleted_at IS NULL", SONG_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Song>, AppError> {
        sqlx::query_as::<_, Song>(&format!("SELECT {} FROM songs WHERE deleted_at IS NULL ORDER BY title ASC, id ASC", SONG_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_filtered(&self, filter: &SongFilter) -> Result<Vec<Song>, AppError> {
        let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM songs WHERE deleted_at IS NULL", SONG_COLUMNS));

        if !filter.ids.is_empty() {
            query.push(" AND id = ANY(").push_bind(filter.ids.clone()).push(")");
        }
        if !filter.bundle_ids.is_empty() {
            query.push(" AND bundle_id = ANY(").push_bind(filter.bundle_ids.clone()).push(")");
        }
        if !filter.creator_ids.is_empty() {
            query.push(" AND creator_id = ANY(").push_bind(filter.creator_ids.clone()).push(")");
        }
        if !filter.keys.is_empty() {
            query.push(" AND song_key = ANY(").push_bind(filter.keys.clone()).push(")");
        }
        if !filter.bpms.is_empty() {
            query.push(" AND bpm = ANY(").push_bind(filter.bpms.clone()).push(")");
        }
        if let Some(pattern) = filter.title_prefix_pattern() {
            query.push(" AND title ILIKE ").push_bind(pattern).push(" ESCAPE '\\'");
        }

        query.push(" ORDER BY title ASC, id ASC");

        query.build_query_as::<Song>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, song: &Song) -> Result<Song, AppError> {
        sqlx::query_as::<_, Song>(&format!(
            "UPDATE songs SET bundle_id = $1, creator_id = $2, title = $3, subtitle = $4, song_key = $5, bpm = $6, chord_sheet = $7, updated_at = $8
             WHERE id = $9 AND deleted_at IS NULL RETURNING {}",
            SONG_COLUMNS
        ))
            .bind(song.bundle_id)
            .bind(song.creator_id)
            .bind(&song.title)
            .bind(&song.subtitle)
            .bind(&song.key)
            .bind(song.bpm)
            .bind(&song.chord_sheet)
            .bind(Utc::now())
            .bind(song.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::record_not_found("id", song.id))
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE songs SET deleted_at = $1 WHERE id = $2 AND deleted_at IS NULL")
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
