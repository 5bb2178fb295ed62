use std::sync::Arc;
use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::config::Config;
use crate::domain::models::{auth::RefreshTokenRecord, user::User};
use crate::domain::ports::{TokenRepository, UserRepository};
use crate::domain::services::jwt::{self, TokenConfig};
use crate::error::AppError;

pub struct TokenService {
    tokens: Arc<dyn TokenRepository>,
    users: Arc<dyn UserRepository>,
    access_secret: String,
    refresh_secret: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(tokens: Arc<dyn TokenRepository>, users: Arc<dyn UserRepository>, config: &Config) -> Self {
        Self {
            tokens,
            users,
            access_secret: config.jwt_access_secret.clone(),
            refresh_secret: config.jwt_refresh_secret.clone(),
            access_ttl: Duration::seconds(config.access_token_ttl_secs),
            refresh_ttl: Duration::seconds(config.refresh_token_ttl_secs),
        }
    }

    /// Returns `existing` untouched while it is still valid for `uid`. Otherwise
    /// issues a new refresh token and revokes whatever the user held before.
    pub async fn create_refresh(&self, uid: i64, existing: Option<&str>) -> Result<String, AppError> {
        if let Some(existing) = existing.filter(|token| !token.is_empty()) {
            if self.is_live_refresh(uid, existing).await? {
                return Ok(existing.to_string());
            }
        }

        let signed = jwt::generate_refresh_token(uid, &TokenConfig {
            issued_at: Utc::now(),
            ttl: self.refresh_ttl,
            secret: &self.refresh_secret,
        })?;

        self.tokens.delete_by_user(uid).await?;
        self.tokens.create(&RefreshTokenRecord {
            token_hash: hash_token(&signed.token),
            user_id: uid,
            expires_at: signed.expires_at,
            created_at: Utc::now(),
        }).await?;

        info!("Issued refresh token for user {}", uid);
        Ok(signed.token)
    }

    pub async fn create_access(&self, refresh: &str) -> Result<String, AppError> {
        if refresh.is_empty() {
            return Err(AppError::BadRequest("no refresh token given".into()));
        }

        let claims = jwt::verify_refresh_token(refresh, &self.refresh_secret)?;

        if !self.is_stored(claims.uid, refresh).await? {
            warn!("Revoked refresh token presented for user {}", claims.uid);
            return Err(AppError::NotAuthorized("refresh token is no longer valid".into()));
        }

        let user = self.users.find_by_id(claims.uid).await?
            .ok_or_else(|| AppError::record_not_found("id", claims.uid))?;

        jwt::generate_access_token(&user, &TokenConfig {
            issued_at: Utc::now(),
            ttl: self.access_ttl,
            secret: &self.access_secret,
        })
    }

    /// Revokes a refresh token. It must have been issued to `uid`.
    pub async fn remove_refresh(&self, uid: i64, refresh: &str) -> Result<(), AppError> {
        if refresh.is_empty() {
            return Err(AppError::BadRequest("no refresh token given".into()));
        }

        let claims = jwt::verify_refresh_token(refresh, &self.refresh_secret)?;
        if claims.uid != uid {
            warn!("User {} tried to revoke a refresh token of user {}", uid, claims.uid);
            return Err(AppError::NotAuthorized("refresh token does not belong to user".into()));
        }

        self.tokens.delete(&hash_token(refresh)).await?;
        info!("Revoked refresh token for user {}", uid);
        Ok(())
    }

    pub fn extract_user(&self, access: &str) -> Result<User, AppError> {
        let claims = jwt::verify_access_token(access, &self.access_secret)?;
        Ok(User::from(claims.user))
    }

    pub fn extract_email(&self, access: &str) -> Result<String, AppError> {
        let claims = jwt::verify_access_token(access, &self.access_secret)?;
        Ok(claims.user.email)
    }

    async fn is_live_refresh(&self, uid: i64, token: &str) -> Result<bool, AppError> {
        match jwt::verify_refresh_token(token, &self.refresh_secret) {
            Ok(claims) if claims.uid == uid => self.is_stored(uid, token).await,
            _ => Ok(false),
        }
    }

    async fn is_stored(&self, uid: i64, token: &str) -> Result<bool, AppError> {
        let hash = hash_token(token);
        let now = Utc::now();
        Ok(self.tokens.list_by_user(uid).await?
            .iter()
            .any(|record| record.token_hash == hash && record.expires_at > now))
    }
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
