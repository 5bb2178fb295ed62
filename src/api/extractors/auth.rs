use axum::{
    extract::{FromRequestParts, FromRef},
    http::{header, request::Parts},
};
use crate::state::AppState;
use crate::domain::models::user::User;
use crate::error::{AppError, ErrorKind};
use std::sync::Arc;
use tracing::{warn, Span};

/// The authenticated principal, taken from `Authorization: Bearer <access token>`.
pub struct AuthUser(pub User);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let value = parts.headers.get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::NotAuthorized("missing authorization header".into()))?
            .to_str()
            .map_err(|_| AppError::BadRequest("malformed authorization header".into()))?;

        let access_token = bearer_token(value)?;

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let claimed = app_state.token_service.extract_user(access_token)?;

        // Clearance comes from the stored user, not from the token
        let user = match app_state.user_service.fetch_by_id(claimed.id).await {
            Ok(user) => user,
            Err(e) if e.kind() == ErrorKind::RecordNotFound => {
                warn!("Access token presented for removed user {}", claimed.id);
                return Err(AppError::NotAuthorized("user no longer exists".into()));
            }
            Err(e) => return Err(e),
        };

        Span::current().record("user_id", user.id);

        Ok(AuthUser(user))
    }
}

fn bearer_token(value: &str) -> Result<&str, AppError> {
    let parts: Vec<&str> = value.split_whitespace().collect();
    match parts.as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        [_, _] => Err(AppError::BadRequest("unsupported authorization scheme".into())),
        _ => Err(AppError::BadRequest("incorrect number of token arguments".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert_eq!(bearer_token("bearer   abc").unwrap(), "abc");
    }

    #[test]
    fn rejects_malformed_headers() {
        assert_eq!(bearer_token("Bearer").unwrap_err().kind(), ErrorKind::BadRequest);
        assert_eq!(bearer_token("Bearer a b").unwrap_err().kind(), ErrorKind::BadRequest);
        assert_eq!(bearer_token("Basic abc").unwrap_err().kind(), ErrorKind::BadRequest);
    }
}
