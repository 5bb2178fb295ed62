use std::sync::Arc;
use tracing::info;

use crate::domain::models::{user::User, user_role::UserRole};
use crate::domain::ports::UserRoleRepository;
use crate::error::AppError;

pub struct UserRoleService {
    user_roles: Arc<dyn UserRoleRepository>,
}

impl UserRoleService {
    pub fn new(user_roles: Arc<dyn UserRoleRepository>) -> Self {
        Self { user_roles }
    }

    pub async fn fetch_all(&self) -> Result<Vec<UserRole>, AppError> {
        self.user_roles.list().await
    }

    pub async fn fetch_by_user(&self, user: &User) -> Result<Vec<UserRole>, AppError> {
        self.user_roles.list_by_user(user.id).await
    }

    /// Makes exactly `ids` the principal's active roles and returns the rows that flipped.
    pub async fn set_active_batch(&self, ids: &[i64], principal: &User) -> Result<Vec<UserRole>, AppError> {
        let current = self.user_roles.list_by_user(principal.id).await?;

        if ids.iter().any(|id| !current.iter().any(|role| role.id == *id)) {
            return Err(AppError::BadRequest("invalid id given".into()));
        }

        let changed: Vec<UserRole> = current
            .into_iter()
            .filter_map(|role| {
                let wanted = ids.contains(&role.id);
                (role.active != wanted).then(|| UserRole { active: wanted, ..role })
            })
            .collect();

        if changed.is_empty() {
            return Err(AppError::BadRequest("no changes were made".into()));
        }

        self.user_roles.update_batch(&changed).await?;
        info!("User {} toggled {} roles", principal.id, changed.len());
        Ok(changed)
    }
}
