use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::models::{
    role::{NewRole, Role},
    user::{Permission, User},
    user_role::NewUserRole,
};
use crate::domain::ports::{RoleRepository, UserRepository, UserRoleRepository};
use crate::error::AppError;

pub struct RoleService {
    roles: Arc<dyn RoleRepository>,
    users: Arc<dyn UserRepository>,
    user_roles: Arc<dyn UserRoleRepository>,
}

impl RoleService {
    pub fn new(
        roles: Arc<dyn RoleRepository>,
        users: Arc<dyn UserRepository>,
        user_roles: Arc<dyn UserRoleRepository>,
    ) -> Self {
        Self { roles, users, user_roles }
    }

    pub async fn fetch_by_id(&self, id: i64) -> Result<Role, AppError> {
        self.roles.find_by_id(id).await?
            .ok_or_else(|| AppError::record_not_found("id", id))
    }

    pub async fn fetch_all(&self) -> Result<Vec<Role>, AppError> {
        self.roles.list().await
    }

    /// Creates the role and an inactive user-role for every existing user.
    pub async fn store(&self, role: &NewRole, principal: &User) -> Result<Role, AppError> {
        if !principal.has_clearance(Permission::Admin) {
            warn!("User {} denied role creation", principal.id);
            return Err(AppError::NotAuthorized("not authorized to create roles".into()));
        }

        let created = self.roles.create(role).await?;

        let user_roles: Vec<NewUserRole> = self.users.list().await?
            .iter()
            .map(|user| NewUserRole::inactive(user.id, created.id))
            .collect();
        self.user_roles.create_batch(&user_roles).await?;

        info!("Role created: {} ({}), assigned to {} users", created.id, created.name, user_roles.len());
        Ok(created)
    }

    pub async fn update(&self, role: &Role, principal: &User) -> Result<Role, AppError> {
        if role.id == 0 {
            return Err(AppError::BadRequest("id cannot be zero".into()));
        }

        if !principal.has_clearance(Permission::Admin) {
            warn!("User {} denied role update", principal.id);
            return Err(AppError::NotAuthorized("not authorized to update roles".into()));
        }

        self.fetch_by_id(role.id).await?;

        let updated = self.roles.update(role).await?;
        info!("Role updated: {}", updated.id);
        Ok(updated)
    }

    pub async fn remove(&self, id: i64, principal: &User) -> Result<(), AppError> {
        if !principal.has_clearance(Permission::Admin) {
            warn!("User {} denied role removal", principal.id);
            return Err(AppError::NotAuthorized("not authorized to remove roles".into()));
        }

        self.roles.delete(id).await?;
        self.user_roles.delete_by_role(id).await?;
        info!("Role removed: {}", id);
        Ok(())
    }
}
