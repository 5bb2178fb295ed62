use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::UpdateBundleRequest;
use crate::domain::models::bundle::{Bundle, NewBundle};
use crate::error::AppError;
use std::sync::Arc;

pub async fn list_bundles(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let bundles = state.bundle_service.fetch_all().await?;
    Ok(Json(serde_json::json!({"bundles": bundles})))
}

pub async fn get_bundle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let bundle = state.bundle_service.fetch_by_id(id).await?;
    Ok(Json(serde_json::json!({"bundle": bundle})))
}

pub async fn create_bundle(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Json(payload): Json<NewBundle>,
) -> Result<impl IntoResponse, AppError> {
    let bundle = state.bundle_service.store(&payload, &principal).await?;
    Ok((StatusCode::CREATED, Json(serde_json::json!({"bundle": bundle}))))
}

pub async fn update_bundle(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateBundleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let bundle = Bundle { id, name: payload.name, parent_id: payload.parent_id };
    let updated = state.bundle_service.update(&bundle, &principal).await?;
    Ok(Json(serde_json::json!({"bundle": updated})))
}

pub async fn delete_bundle(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state.bundle_service.remove(id, &principal).await?;
    Ok(Json(serde_json::json!({"id": id})))
}
