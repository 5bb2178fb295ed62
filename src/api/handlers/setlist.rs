use axum::{extract::{State, Path, Query}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{parse_time, CreateSetlistRequest, EntryRequest, TimeframeQuery, UpdateSetlistRequest};
use crate::api::dtos::responses::SetlistWithEntries;
use crate::domain::models::setlist::{NewSetlist, Setlist};
use crate::domain::models::setlist_entry::{NewSetlistEntry, SetlistEntry};
use crate::error::AppError;
use chrono::Utc;
use sqlx::types::Json as DbJson;
use std::sync::Arc;
use tracing::info;

/// Entries without an explicit rank are spaced by 100 in request order.
fn new_entries(setlist_id: i64, requests: Vec<EntryRequest>) -> Vec<NewSetlistEntry> {
    requests
        .into_iter()
        .enumerate()
        .map(|(pos, entry)| NewSetlistEntry {
            song_id: entry.song_id,
            setlist_id,
            transpose: entry.transpose,
            notes: entry.notes,
            arrangement: entry.arrangement,
            rank: entry.rank.unwrap_or((pos as i64 + 1) * 100),
        })
        .collect()
}

pub async fn list_setlists(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TimeframeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let from = parse_time("from", query.from.as_deref())?;
    let to = parse_time("to", query.to.as_deref())?;

    let setlists = state.setlist_service.fetch_by_timeframe(from, to).await?;
    let entries = if setlists.is_empty() {
        Vec::new()
    } else {
        state.setlist_entry_service.fetch_by_setlists(&setlists).await?
    };

    let setlists = SetlistWithEntries::group(setlists, entries);
    Ok(Json(serde_json::json!({"setlists": setlists})))
}

pub async fn get_setlist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let setlist = state.setlist_service.fetch_by_id(id).await?;
    let entries = state.setlist_entry_service.fetch_by_setlists(std::slice::from_ref(&setlist)).await?;

    Ok(Json(serde_json::json!({"setlist": SetlistWithEntries { setlist, entries }})))
}

/// Entries are vetted before the setlist is stored, so a rejected entry leaves nothing behind.
pub async fn create_setlist(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Json(payload): Json<CreateSetlistRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut entries = new_entries(0, payload.created_entries);
    if !entries.is_empty() {
        state.setlist_entry_service.check_store(&entries, &principal).await?;
    }

    let setlist = state.setlist_service.store(&NewSetlist {
        name: payload.name,
        creator_id: payload.creator_id.unwrap_or(principal.id),
        deadline: payload.deadline,
    }, &principal).await?;

    let entries = if entries.is_empty() {
        Vec::new()
    } else {
        for entry in &mut entries {
            entry.setlist_id = setlist.id;
        }
        state.setlist_entry_service.store_batch(&entries, &principal).await?
    };

    Ok((StatusCode::CREATED, Json(serde_json::json!({"setlist": SetlistWithEntries { setlist, entries }}))))
}

/// Vets every entry change first, then updates the setlist itself and applies
/// created, updated and deleted entries in that order.
pub async fn update_setlist(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateSetlistRequest>,
) -> Result<impl IntoResponse, AppError> {
    let current = state.setlist_service.fetch_by_id(id).await?;
    let entry_service = &state.setlist_entry_service;

    let created = new_entries(id, payload.created_entries);
    if !created.is_empty() {
        entry_service.check_store(&created, &principal).await?;
    }

    let mut updated = Vec::with_capacity(payload.updated_entries.len());
    for entry in payload.updated_entries {
        let rank = match entry.rank {
            Some(rank) => rank,
            None => entry_service.fetch_by_id(entry.id).await?.rank,
        };
        updated.push(SetlistEntry {
            id: entry.id,
            song_id: entry.song_id,
            setlist_id: id,
            transpose: entry.transpose,
            notes: entry.notes,
            arrangement: DbJson(entry.arrangement),
            rank,
        });
    }
    if !updated.is_empty() {
        entry_service.check_update(&updated, &principal).await?;
    }

    if !payload.deleted_entries.is_empty() {
        entry_service.check_remove(&current, &payload.deleted_entries, &principal).await?;
    }

    let setlist = state.setlist_service.update(&Setlist {
        id,
        name: payload.name,
        creator_id: payload.creator_id.unwrap_or(current.creator_id),
        deadline: payload.deadline,
        updated_at: Utc::now(),
    }, &principal).await?;

    if !created.is_empty() {
        entry_service.store_batch(&created, &principal).await?;
    }
    if !updated.is_empty() {
        entry_service.update_batch(&updated, &principal).await?;
    }
    if !payload.deleted_entries.is_empty() {
        entry_service.remove_batch(&current, &payload.deleted_entries, &principal).await?;
    }

    let entries = entry_service.fetch_by_setlists(std::slice::from_ref(&setlist)).await?;
    info!("Setlist {} updated by {}", setlist.id, principal.id);

    Ok(Json(serde_json::json!({"setlist": SetlistWithEntries { setlist, entries }})))
}

pub async fn delete_setlist(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let setlist = state.setlist_service.fetch_by_id(id).await?;

    state.setlist_entry_service.remove_by_setlist(&setlist, &principal).await?;
    state.setlist_service.remove(id, &principal).await?;

    Ok(Json(serde_json::json!({"id": id})))
}
