use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::SetActiveRolesRequest;
use crate::error::AppError;
use std::sync::Arc;

pub async fn list_user_roles(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let user_roles = state.user_role_service.fetch_all().await?;
    Ok(Json(serde_json::json!({"user_roles": user_roles})))
}

pub async fn list_my_user_roles(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user_roles = state.user_role_service.fetch_by_user(&principal).await?;
    Ok(Json(serde_json::json!({"user_roles": user_roles})))
}

pub async fn set_active_roles(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Json(payload): Json<SetActiveRolesRequest>,
) -> Result<impl IntoResponse, AppError> {
    let changed = state.user_role_service.set_active_batch(&payload.ids, &principal).await?;
    Ok(Json(serde_json::json!({"user_roles": changed})))
}
