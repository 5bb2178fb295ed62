use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::error::ErrorKind as DbErrorKind;
use thiserror::Error;
use tracing::error;

const INTERNAL_MESSAGE: &str = "something went wrong in the server";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    NotAuthorized(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

/// The four outcomes a caller can observe, independent of transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    NotAuthorized,
    RecordNotFound,
    Internal,
}

impl ErrorKind {
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::NotAuthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::RecordNotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl AppError {
    pub fn record_not_found(key: &str, value: impl std::fmt::Display) -> Self {
        AppError::NotFound(format!("could not find a record with {} = {}", key, value))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Database(e) => match e {
                sqlx::Error::RowNotFound => ErrorKind::RecordNotFound,
                sqlx::Error::Database(db_err) => match db_err.kind() {
                    DbErrorKind::UniqueViolation
                    | DbErrorKind::ForeignKeyViolation
                    | DbErrorKind::NotNullViolation
                    | DbErrorKind::CheckViolation => ErrorKind::BadRequest,
                    _ => ErrorKind::Internal,
                },
                _ => ErrorKind::Internal,
            },
            AppError::NotFound(_) => ErrorKind::RecordNotFound,
            AppError::NotAuthorized(_) => ErrorKind::NotAuthorized,
            AppError::BadRequest(_) => ErrorKind::BadRequest,
            AppError::Internal | AppError::InternalWithMsg(_) => ErrorKind::Internal,
        }
    }

    /// Message safe to hand to a caller. Storage details never leak for internal failures.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Database(sqlx::Error::Database(db_err)) if self.kind() == ErrorKind::BadRequest => {
                db_err.message().to_string()
            }
            AppError::Database(sqlx::Error::RowNotFound) => "record not found".to_string(),
            AppError::NotFound(msg) | AppError::NotAuthorized(msg) | AppError::BadRequest(msg) => msg.clone(),
            _ => INTERNAL_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();

        match &self {
            AppError::Database(e) if kind == ErrorKind::Internal => error!("Database error: {:?}", e),
            AppError::InternalWithMsg(msg) => error!("Internal error: {}", msg),
            AppError::Internal => error!("Internal error"),
            _ => {}
        }

        let body = Json(json!({
            "error": self.public_message()
        }));

        (kind.status_code(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_transport_statuses() {
        assert_eq!(ErrorKind::BadRequest.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::NotAuthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorKind::RecordNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorKind::Internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn internal_messages_are_redacted() {
        let err = AppError::InternalWithMsg("connection reset by peer".into());
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.public_message(), INTERNAL_MESSAGE);

        let err = AppError::Database(sqlx::Error::PoolTimedOut);
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.public_message(), INTERNAL_MESSAGE);
    }

    #[test]
    fn record_not_found_formats_key_and_value() {
        let err = AppError::record_not_found("id", 42);
        assert_eq!(err.kind(), ErrorKind::RecordNotFound);
        assert_eq!(err.public_message(), "could not find a record with id = 42");
    }
}
