use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::models::{
    setlist::Setlist,
    setlist_role::{NewSetlistRole, SetlistRole},
    user::{Permission, User},
};
use crate::domain::ports::{SetlistRepository, SetlistRoleRepository, UserRoleRepository};
use crate::error::AppError;

pub struct SetlistRoleService {
    setlist_roles: Arc<dyn SetlistRoleRepository>,
    setlists: Arc<dyn SetlistRepository>,
    user_roles: Arc<dyn UserRoleRepository>,
}

impl SetlistRoleService {
    pub fn new(
        setlist_roles: Arc<dyn SetlistRoleRepository>,
        setlists: Arc<dyn SetlistRepository>,
        user_roles: Arc<dyn UserRoleRepository>,
    ) -> Self {
        Self { setlist_roles, setlists, user_roles }
    }

    pub async fn fetch(&self, setlists: &[Setlist]) -> Result<Vec<SetlistRole>, AppError> {
        let ids: Vec<i64> = setlists.iter().map(|setlist| setlist.id).collect();
        self.setlist_roles.list_by_setlists(&ids).await
    }

    pub async fn store(&self, setlist_roles: &[NewSetlistRole], principal: &User) -> Result<Vec<SetlistRole>, AppError> {
        if setlist_roles.is_empty() {
            return Err(AppError::BadRequest("No setlistroles given".into()));
        }

        if !principal.has_clearance(Permission::Admin) {
            let user_role_ids: Vec<i64> = setlist_roles.iter().map(|role| role.user_role_id).collect();
            self.ensure_own_user_roles(&user_role_ids, principal).await?;
        }

        let setlist_ids = unique(setlist_roles.iter().map(|role| role.setlist_id));
        let found = self.setlists.find_by_ids(&setlist_ids).await?;
        if let Some(missing) = setlist_ids.iter().find(|id| !found.iter().any(|setlist| setlist.id == **id)) {
            return Err(AppError::record_not_found("setlist_id", missing));
        }

        let created = self.setlist_roles.create_batch(setlist_roles).await?;
        info!("Created {} setlist roles", created.len());
        Ok(created)
    }

    /// Removing nothing is a no-op.
    pub async fn remove(&self, ids: &[i64], principal: &User) -> Result<(), AppError> {
        if ids.is_empty() {
            return Ok(());
        }

        let ids = unique(ids.iter().copied());
        let found = self.setlist_roles.find_by_ids(&ids).await?;
        if let Some(missing) = ids.iter().find(|id| !found.iter().any(|role| role.id == **id)) {
            return Err(AppError::record_not_found("id", missing));
        }

        if !principal.has_clearance(Permission::Admin) {
            let user_role_ids: Vec<i64> = found.iter().map(|role| role.user_role_id).collect();
            self.ensure_own_user_roles(&user_role_ids, principal).await?;
        }

        self.setlist_roles.delete_batch(&ids).await?;
        info!("Removed {} setlist roles", ids.len());
        Ok(())
    }

    async fn ensure_own_user_roles(&self, user_role_ids: &[i64], principal: &User) -> Result<(), AppError> {
        let user_role_ids = unique(user_role_ids.iter().copied());
        let user_roles = self.user_roles.find_by_ids(&user_role_ids).await?;

        if let Some(missing) = user_role_ids.iter().find(|id| !user_roles.iter().any(|role| role.id == **id)) {
            return Err(AppError::record_not_found("user_role_id", missing));
        }

        if user_roles.iter().any(|role| role.user_id != principal.id) {
            warn!("User {} tried to change setlist roles of someone else", principal.id);
            return Err(AppError::NotAuthorized("Cannot change the Setlist Role of someone else".into()));
        }

        Ok(())
    }
}

fn unique(ids: impl Iterator<Item = i64>) -> Vec<i64> {
    let mut out: Vec<i64> = Vec::new();
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}
