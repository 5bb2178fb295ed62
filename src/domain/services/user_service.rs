use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::models::{
    user::{NewUser, Permission, User, UserUpdate},
    user_role::NewUserRole,
};
use crate::domain::ports::{RoleRepository, UserRepository, UserRoleRepository};
use crate::domain::services::password;
use crate::error::AppError;

pub struct UserService {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
    user_roles: Arc<dyn UserRoleRepository>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        roles: Arc<dyn RoleRepository>,
        user_roles: Arc<dyn UserRoleRepository>,
    ) -> Self {
        Self { users, roles, user_roles }
    }

    pub async fn fetch_by_id(&self, id: i64) -> Result<User, AppError> {
        self.users.find_by_id(id).await?
            .ok_or_else(|| AppError::record_not_found("id", id))
    }

    pub async fn fetch_by_email(&self, email: &str) -> Result<User, AppError> {
        self.users.find_by_email(email).await?
            .ok_or_else(|| AppError::record_not_found("email", email))
    }

    pub async fn fetch_all(&self) -> Result<Vec<User>, AppError> {
        self.users.list().await
    }

    /// Hashes the password, creates the user and gives it an inactive
    /// user-role for every existing role.
    pub async fn store(&self, user: &NewUser) -> Result<User, AppError> {
        let mut user = user.clone();
        if !user.password.is_empty() {
            user.password = password::hash_password(&user.password)?;
        }

        let created = self.users.create(&user).await?;

        let user_roles: Vec<NewUserRole> = self.roles.list().await?
            .iter()
            .map(|role| NewUserRole::inactive(created.id, role.id))
            .collect();
        self.user_roles.create_batch(&user_roles).await?;

        info!("User created: {} ({})", created.id, created.email);
        Ok(created)
    }

    pub async fn update(&self, update: &UserUpdate) -> Result<User, AppError> {
        if update.id == 0 {
            return Err(AppError::record_not_found("user_id", 0));
        }

        let mut user = self.fetch_by_id(update.id).await?;
        user.first_name = update.first_name.clone();
        user.last_name = update.last_name.clone();
        user.profile_color = update.profile_color.clone();

        if let Some(new_password) = update.password.as_deref().filter(|p| !p.is_empty()) {
            user.password_hash = password::hash_password(new_password)?;
        }

        let updated = self.users.update(&user).await?;
        info!("User updated: {}", updated.id);
        Ok(updated)
    }

    /// `id == 0` removes the principal. Returns the removed id.
    pub async fn remove(&self, principal: &User, id: i64) -> Result<i64, AppError> {
        let target = if id == 0 { principal.id } else { id };

        if target != principal.id && !principal.has_clearance(Permission::Admin) {
            warn!("User {} denied removal of user {}", principal.id, target);
            return Err(AppError::NotAuthorized("cannot delete given id".into()));
        }

        self.fetch_by_id(target).await?;

        self.users.delete(target).await?;
        self.user_roles.delete_by_user(target).await?;
        info!("User removed: {}", target);
        Ok(target)
    }

    pub async fn set_permission(&self, permission: Permission, recipient_id: i64, principal: &User) -> Result<User, AppError> {
        if !principal.has_clearance(Permission::Admin) {
            warn!("User {} denied permission change for {}", principal.id, recipient_id);
            return Err(AppError::NotAuthorized("not authorized to change permissions".into()));
        }

        let mut recipient = self.fetch_by_id(recipient_id).await?;
        recipient.permission = permission;

        let updated = self.users.update(&recipient).await?;
        info!("User {} now has permission {:?}", updated.id, updated.permission);
        Ok(updated)
    }

    /// Unknown email and wrong password fail identically.
    pub async fn authorize(&self, email: &str, password: &str) -> Result<User, AppError> {
        let user = self.users.find_by_email(email).await?
            .filter(|user| password::verify_password(password, &user.password_hash))
            .ok_or_else(|| AppError::NotAuthorized("email and/or password is incorrect".into()))?;

        info!("User logged in: {}", user.id);
        Ok(user)
    }
}
