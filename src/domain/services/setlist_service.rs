use std::sync::Arc;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::domain::models::{
    setlist::{NewSetlist, Setlist},
    user::{Permission, User},
};
use crate::domain::ports::{SetlistRepository, UserRepository};
use crate::error::AppError;

pub struct SetlistService {
    users: Arc<dyn UserRepository>,
    setlists: Arc<dyn SetlistRepository>,
}

impl SetlistService {
    pub fn new(users: Arc<dyn UserRepository>, setlists: Arc<dyn SetlistRepository>) -> Self {
        Self { users, setlists }
    }

    pub async fn fetch_by_id(&self, id: i64) -> Result<Setlist, AppError> {
        self.setlists.find_by_id(id).await?
            .ok_or_else(|| AppError::record_not_found("id", id))
    }

    pub async fn fetch_all(&self) -> Result<Vec<Setlist>, AppError> {
        self.setlists.list().await
    }

    /// Setlists whose deadline falls within the given inclusive bounds.
    pub async fn fetch_by_timeframe(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<Setlist>, AppError> {
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(AppError::BadRequest(format!("{} must be earlier than {}", from, to)));
            }
        }
        self.setlists.list_by_timeframe(from, to).await
    }

    pub async fn store(&self, setlist: &NewSetlist, principal: &User) -> Result<Setlist, AppError> {
        if !principal.has_clearance(Permission::Member) {
            warn!("User {} denied setlist creation", principal.id);
            return Err(AppError::NotAuthorized("Not authorized to create setlists".into()));
        }

        ensure_future(setlist.deadline)?;
        self.ensure_creator(setlist.creator_id).await?;

        let created = self.setlists.create(setlist).await?;
        info!("Setlist created: {} ({})", created.id, created.name);
        Ok(created)
    }

    pub async fn update(&self, setlist: &Setlist, principal: &User) -> Result<Setlist, AppError> {
        let current = self.fetch_by_id(setlist.id).await?;

        if !principal.has_clearance(Permission::Admin) && current.creator_id != principal.id {
            warn!("User {} denied update of setlist {}", principal.id, setlist.id);
            return Err(AppError::NotAuthorized("Not authorized to update setlist".into()));
        }

        ensure_future(setlist.deadline)?;
        self.ensure_creator(setlist.creator_id).await?;

        let updated = self.setlists.update(setlist).await?;
        info!("Setlist updated: {}", updated.id);
        Ok(updated)
    }

    pub async fn remove(&self, id: i64, principal: &User) -> Result<(), AppError> {
        if !principal.has_clearance(Permission::Admin) {
            let current = self.fetch_by_id(id).await?;
            if current.creator_id != principal.id {
                warn!("User {} denied removal of setlist {}", principal.id, id);
                return Err(AppError::NotAuthorized("user is neither an admin nor creator of the setlist".into()));
            }
        }

        self.setlists.delete(id).await?;
        info!("Setlist removed: {}", id);
        Ok(())
    }

    async fn ensure_creator(&self, creator_id: i64) -> Result<(), AppError> {
        match self.users.find_by_id(creator_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::record_not_found("creator_id", creator_id)),
        }
    }
}

fn ensure_future(deadline: DateTime<Utc>) -> Result<(), AppError> {
    let now = Utc::now();
    if deadline < now {
        return Err(AppError::BadRequest(format!("{} must be later than {}", deadline, now)));
    }
    Ok(())
}
