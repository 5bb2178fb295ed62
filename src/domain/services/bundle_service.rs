use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::models::{
    bundle::{Bundle, NewBundle},
    user::{Permission, User},
};
use crate::domain::ports::BundleRepository;
use crate::error::AppError;

pub struct BundleService {
    bundles: Arc<dyn BundleRepository>,
}

impl BundleService {
    pub fn new(bundles: Arc<dyn BundleRepository>) -> Self {
        Self { bundles }
    }

    pub async fn fetch_by_id(&self, id: i64) -> Result<Bundle, AppError> {
        self.bundles.find_by_id(id).await?
            .ok_or_else(|| AppError::record_not_found("id", id))
    }

    pub async fn fetch_all(&self) -> Result<Vec<Bundle>, AppError> {
        self.bundles.list().await
    }

    pub async fn store(&self, bundle: &NewBundle, principal: &User) -> Result<Bundle, AppError> {
        ensure_member(principal)?;
        self.ensure_parent(bundle.parent_id).await?;

        let created = self.bundles.create(bundle).await?;
        info!("Bundle created: {} under parent {}", created.id, created.parent_id);
        Ok(created)
    }

    pub async fn update(&self, bundle: &Bundle, principal: &User) -> Result<Bundle, AppError> {
        ensure_member(principal)?;

        self.fetch_by_id(bundle.id).await?;

        if bundle.parent_id == bundle.id {
            return Err(AppError::BadRequest("a bundle cannot be its own parent".into()));
        }
        self.ensure_parent(bundle.parent_id).await?;

        let updated = self.bundles.update(bundle).await?;
        info!("Bundle updated: {}", updated.id);
        Ok(updated)
    }

    /// Only leaf bundles can be removed.
    pub async fn remove(&self, id: i64, principal: &User) -> Result<(), AppError> {
        ensure_member(principal)?;

        self.fetch_by_id(id).await?;

        let leaves = self.bundles.list_leaves().await?;
        if !leaves.iter().any(|leaf| leaf.id == id) {
            return Err(AppError::BadRequest("given id is not a leaf bundle".into()));
        }

        self.bundles.delete(id).await?;
        info!("Bundle removed: {}", id);
        Ok(())
    }

    /// `0` is the root. Anything else must name a live bundle.
    async fn ensure_parent(&self, parent_id: i64) -> Result<(), AppError> {
        if parent_id < 0 {
            return Err(AppError::BadRequest("parent_id is invalid".into()));
        }
        if parent_id > 0 {
            self.fetch_by_id(parent_id).await?;
        }
        Ok(())
    }
}

fn ensure_member(principal: &User) -> Result<(), AppError> {
    if !principal.has_clearance(Permission::Member) {
        warn!("User {} denied bundle mutation", principal.id);
        return Err(AppError::NotAuthorized("not authorized to modify bundles".into()));
    }
    Ok(())
}
