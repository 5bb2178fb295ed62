use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{LoginRequest, RegisterRequest, SetPermissionRequest};
use crate::api::dtos::responses::LoginResponse;
use crate::domain::models::user::{NewUser, Permission};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

/// Self-registration always yields a guest; promotion goes through `set_permission`.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::BadRequest("email and password are required".into()));
    }

    let user = state.user_service.store(&NewUser {
        email: payload.email.trim().to_string(),
        password: payload.password,
        first_name: payload.first_name,
        last_name: payload.last_name,
        permission: Permission::Guest,
        profile_color: payload.profile_color,
    }).await?;

    Ok((StatusCode::CREATED, Json(serde_json::json!({"user": user}))))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_service.authorize(&payload.email, &payload.password).await?;

    let refresh = state.token_service.create_refresh(user.id, payload.refresh.as_deref()).await?;
    let access = state.token_service.create_access(&refresh).await?;

    Ok(Json(LoginResponse { user, access, refresh }))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let users = state.user_service.fetch_all().await?;
    Ok(Json(serde_json::json!({"users": users})))
}

pub async fn set_permission(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<SetPermissionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_service.set_permission(payload.permission, id, &principal).await?;
    Ok(Json(serde_json::json!({"user": user})))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let removed = state.user_service.remove(&principal, id).await?;
    info!("User {} removed by {}", removed, principal.id);
    Ok(Json(serde_json::json!({"id": removed})))
}
