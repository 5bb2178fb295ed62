use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::RefreshRequest;
use crate::error::AppError;
use std::sync::Arc;

pub async fn renew_access(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RefreshRequest>,
) -> Result<impl IntoResponse, AppError> {
    let access = state.token_service.create_access(&payload.refresh).await?;
    Ok(Json(serde_json::json!({"access": access})))
}
