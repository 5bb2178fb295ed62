use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{RefreshRequest, UpdateMeRequest};
use crate::domain::models::user::UserUpdate;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn get_me(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_service.fetch_by_id(principal.id).await?;
    Ok(Json(serde_json::json!({"user": user})))
}

pub async fn update_me(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Json(payload): Json<UpdateMeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_service.update(&UserUpdate {
        id: principal.id,
        first_name: payload.first_name,
        last_name: payload.last_name,
        profile_color: payload.profile_color,
        password: payload.password,
    }).await?;
    Ok(Json(serde_json::json!({"user": user})))
}

pub async fn delete_me(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let removed = state.user_service.remove(&principal, 0).await?;
    Ok(Json(serde_json::json!({"id": removed})))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Json(payload): Json<RefreshRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.token_service.remove_refresh(principal.id, &payload.refresh).await?;
    info!("User logged out: {}", principal.id);
    Ok(Json(serde_json::json!({"status": "logged out"})))
}
