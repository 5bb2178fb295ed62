use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::domain::models::{
    auth::{AccessClaims, RefreshClaims, UserProfile},
    user::User,
};
use crate::error::AppError;

pub struct TokenConfig<'a> {
    pub issued_at: DateTime<Utc>,
    pub ttl: Duration,
    pub secret: &'a str,
}

/// A freshly signed refresh token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct SignedRefresh {
    pub token: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

pub fn generate_access_token(user: &User, config: &TokenConfig) -> Result<String, AppError> {
    let claims = AccessClaims {
        user: UserProfile::from(user),
        iat: config.issued_at.timestamp(),
        exp: (config.issued_at + config.ttl).timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    sign(&claims, config.secret)
}

pub fn generate_refresh_token(uid: i64, config: &TokenConfig) -> Result<SignedRefresh, AppError> {
    let expires_at = config.issued_at + config.ttl;
    let claims = RefreshClaims {
        uid,
        iat: config.issued_at.timestamp(),
        exp: expires_at.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    Ok(SignedRefresh {
        token: sign(&claims, config.secret)?,
        user_id: uid,
        expires_at,
    })
}

pub fn verify_access_token(token: &str, secret: &str) -> Result<AccessClaims, AppError> {
    verify(token, secret)
}

pub fn verify_refresh_token(token: &str, secret: &str) -> Result<RefreshClaims, AppError> {
    verify(token, secret)
}

fn sign<C: serde::Serialize>(claims: &C, secret: &str) -> Result<String, AppError> {
    encode(&Header::new(Algorithm::HS256), claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| {
            tracing::error!("JWT encoding failed: {}", e);
            AppError::InternalWithMsg("could not sign token".into())
        })
}

fn verify<C: serde::de::DeserializeOwned>(token: &str, secret: &str) -> Result<C, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<C>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| AppError::NotAuthorized(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::user::Permission;
    use crate::error::ErrorKind;

    fn config(secret: &str) -> TokenConfig<'_> {
        TokenConfig { issued_at: Utc::now(), ttl: Duration::minutes(15), secret }
    }

    fn user() -> User {
        User {
            id: 7,
            email: "foo@bar.com".into(),
            password_hash: "$argon2id$secret".into(),
            first_name: "Foo".into(),
            last_name: "Bar".into(),
            permission: Permission::Editor,
            profile_color: "FF00FF".into(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn refresh_token_round_trip_recovers_uid() {
        let signed = generate_refresh_token(42, &config("refresh-secret")).unwrap();
        let claims = verify_refresh_token(&signed.token, "refresh-secret").unwrap();
        assert_eq!(claims.uid, 42);
        assert_eq!(claims.exp, signed.expires_at.timestamp());
    }

    #[test]
    fn refresh_token_with_other_secret_is_rejected() {
        let signed = generate_refresh_token(42, &config("refresh-secret")).unwrap();
        let err = verify_refresh_token(&signed.token, "another-secret").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAuthorized);
    }

    #[test]
    fn expired_refresh_token_is_rejected() {
        let config = TokenConfig {
            issued_at: Utc::now() - Duration::hours(2),
            ttl: Duration::hours(1),
            secret: "refresh-secret",
        };
        let signed = generate_refresh_token(42, &config).unwrap();
        let err = verify_refresh_token(&signed.token, "refresh-secret").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAuthorized);
    }

    #[test]
    fn access_token_carries_redacted_user() {
        let token = generate_access_token(&user(), &config("access-secret")).unwrap();
        let claims = verify_access_token(&token, "access-secret").unwrap();
        assert_eq!(claims.user.id, 7);
        assert_eq!(claims.user.email, "foo@bar.com");
        assert_eq!(claims.user.permission, Permission::Editor);
    }

    #[test]
    fn tokens_are_not_interchangeable() {
        let refresh = generate_refresh_token(7, &config("secret")).unwrap();
        assert!(verify_access_token(&refresh.token, "secret").is_err());
    }
}
