use axum::{extract::{State, Query}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{parse_list, CreateSetlistRolesRequest, IdsQuery};
use crate::error::AppError;
use std::sync::Arc;

/// `?ids=` names the setlists whose roles are returned.
pub async fn list_setlist_roles(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IdsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let ids: Vec<i64> = parse_list("ids", query.ids.as_deref())?;

    let mut setlists = Vec::with_capacity(ids.len());
    for id in ids {
        setlists.push(state.setlist_service.fetch_by_id(id).await?);
    }

    let setlist_roles = state.setlist_role_service.fetch(&setlists).await?;
    Ok(Json(serde_json::json!({"setlist_roles": setlist_roles})))
}

pub async fn create_setlist_roles(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Json(payload): Json<CreateSetlistRolesRequest>,
) -> Result<impl IntoResponse, AppError> {
    let created = state.setlist_role_service.store(&payload.setlist_roles, &principal).await?;
    Ok((StatusCode::CREATED, Json(serde_json::json!({"setlist_roles": created}))))
}

/// `?ids=` names the setlist roles to remove.
pub async fn delete_setlist_roles(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Query(query): Query<IdsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let ids: Vec<i64> = parse_list("ids", query.ids.as_deref())?;
    state.setlist_role_service.remove(&ids, &principal).await?;
    Ok(Json(serde_json::json!({"ids": ids})))
}
