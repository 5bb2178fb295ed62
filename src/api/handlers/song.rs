use axum::{extract::{State, Path, Query}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{parse_list, CreateSongRequest, SongQuery, UpdateSongRequest};
use crate::domain::models::song::{NewSong, Song, SongFilter};
use crate::error::AppError;
use chrono::Utc;
use sqlx::types::Json as DbJson;
use std::sync::Arc;

pub async fn list_songs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SongQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = SongFilter {
        ids: parse_list("ids", query.ids.as_deref())?,
        bundle_ids: parse_list("bids", query.bids.as_deref())?,
        creator_ids: parse_list("cids", query.cids.as_deref())?,
        title: query.title.filter(|title| !title.trim().is_empty()),
        keys: parse_list("keys", query.keys.as_deref())?,
        bpms: parse_list("bpms", query.bpms.as_deref())?,
    };

    let songs = state.song_service.fetch(&filter).await?;
    Ok(Json(serde_json::json!({"songs": songs})))
}

pub async fn get_song(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let song = state.song_service.fetch_by_id(id).await?;
    Ok(Json(serde_json::json!({"song": song})))
}

pub async fn create_song(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Json(payload): Json<CreateSongRequest>,
) -> Result<impl IntoResponse, AppError> {
    let song = state.song_service.store(&NewSong {
        bundle_id: payload.bundle_id,
        creator_id: payload.creator_id.unwrap_or(principal.id),
        title: payload.title,
        subtitle: payload.subtitle,
        key: payload.key,
        bpm: payload.bpm,
        chord_sheet: payload.chord_sheet,
    }, &principal).await?;

    Ok((StatusCode::CREATED, Json(serde_json::json!({"song": song}))))
}

pub async fn update_song(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateSongRequest>,
) -> Result<impl IntoResponse, AppError> {
    let song = Song {
        id,
        bundle_id: payload.bundle_id,
        creator_id: payload.creator_id,
        title: payload.title,
        subtitle: payload.subtitle,
        key: payload.key,
        bpm: payload.bpm,
        chord_sheet: DbJson(payload.chord_sheet),
        updated_at: Utc::now(),
    };

    let updated = state.song_service.update(&song, &principal).await?;
    Ok(Json(serde_json::json!({"song": updated})))
}

pub async fn delete_song(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state.song_service.remove(id, &principal).await?;
    Ok(Json(serde_json::json!({"id": id})))
}
