use crate::domain::{models::song::{NewSong, Song, SongFilter}, ports::SongRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{types::Json, QueryBuilder, Sqlite, SqlitePool};

const SONG_COLUMNS: &str = "id, bundle_id, creator_id, title, subtitle, song_key, bpm, chord_sheet, updated_at";

pub struct SqliteSongRepo {
    pool: SqlitePool,
}

impl SqliteSongRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SongRepository for SqliteSongRepo {
    async fn create(&self, song: &NewSong) -> Result<Song, AppError> {
        sqlx::query_as::<_, Song>(&format!(
            "INSERT INTO songs (bundle_id, creator_id, title, subtitle, song_key, bpm, chord_sheet, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING {}",
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
        sqlx::query_as::<_, Song>(&format!("SELECT {} FROM songs WHERE id = ? AND deleted_at IS NULL", SONG_COLUMNS))
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
        let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM songs WHERE deleted_at IS NULL", SONG_COLUMNS));

        push_in(&mut query, "id", &filter.ids);
        push_in(&mut query, "bundle_id", &filter.bundle_ids);
        push_in(&mut query, "creator_id", &filter.creator_ids);
        push_in(&mut query, "song_key", &filter.keys);
        push_in(&mut query, "bpm", &filter.bpms);

        if let Some(pattern) = filter.title_prefix_pattern() {
            query.push(" AND title LIKE ");
            query.push_bind(pattern);
            query.push(" ESCAPE '\\'");
        }

        query.push(" ORDER BY title ASC, id ASC");

        query.build_query_as::<Song>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, song: &Song) -> Result<Song, AppError> {
        sqlx::query_as::<_, Song>(&format!(
            "UPDATE songs SET bundle_id = ?, creator_id = ?, title = ?, subtitle = ?, song_key = ?, bpm = ?, chord_sheet = ?, updated_at = ?
             WHERE id = ? AND deleted_at IS NULL RETURNING {}",
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
        let result = sqlx::query("UPDATE songs SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL")
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

fn push_in<'args, T>(query: &mut QueryBuilder<'args, Sqlite>, column: &str, values: &[T])
where
    T: 'args + sqlx::Encode<'args, Sqlite> + sqlx::Type<Sqlite> + Clone + Send,
{
    if values.is_empty() {
        return;
    }

    query.push(format!(" AND {} IN (", column));
    let mut separated = query.separated(", ");
    for value in values {
        separated.push_bind(value.clone());
    }
    separated.push_unseparated(")");
}
