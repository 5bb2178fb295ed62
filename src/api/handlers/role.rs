use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::UpdateRoleRequest;
use crate::domain::models::role::{NewRole, Role};
use crate::error::AppError;
use std::sync::Arc;

pub async fn list_roles(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let roles = state.role_service.fetch_all().await?;
    Ok(Json(serde_json::json!({"roles": roles})))
}

pub async fn create_role(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Json(payload): Json<NewRole>,
) -> Result<impl IntoResponse, AppError> {
    let role = state.role_service.store(&payload, &principal).await?;
    Ok((StatusCode::CREATED, Json(serde_json::json!({"role": role}))))
}

pub async fn update_role(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateRoleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let role = Role { id, name: payload.name, description: payload.description };
    let updated = state.role_service.update(&role, &principal).await?;
    Ok(Json(serde_json::json!({"role": updated})))
}

pub async fn delete_role(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state.role_service.remove(id, &principal).await?;
    Ok(Json(serde_json::json!({"id": id})))
}
