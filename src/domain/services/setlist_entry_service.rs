use std::sync::Arc;
use tracing::{error, info, warn};

use crate::domain::models::{
    setlist::Setlist,
    setlist_entry::{is_valid_transpose, ranks_non_decreasing, EntryFields, NewSetlistEntry, SetlistEntry, TRANSPOSE_MAX, TRANSPOSE_MIN},
    user::{Permission, User},
};
use crate::domain::ports::{SetlistEntryRepository, SetlistRepository, SongRepository};
use crate::error::AppError;

pub struct SetlistEntryService {
    entries: Arc<dyn SetlistEntryRepository>,
    setlists: Arc<dyn SetlistRepository>,
    songs: Arc<dyn SongRepository>,
}

impl SetlistEntryService {
    pub fn new(
        entries: Arc<dyn SetlistEntryRepository>,
        setlists: Arc<dyn SetlistRepository>,
        songs: Arc<dyn SongRepository>,
    ) -> Self {
        Self { entries, setlists, songs }
    }

    pub async fn fetch_by_id(&self, id: i64) -> Result<SetlistEntry, AppError> {
        self.entries.find_by_id(id).await?
            .ok_or_else(|| AppError::record_not_found("id", id))
    }

    pub async fn fetch_all(&self) -> Result<Vec<SetlistEntry>, AppError> {
        let entries = self.entries.list().await?;
        ensure_ranked(entries)
    }

    pub async fn fetch_by_setlists(&self, setlists: &[Setlist]) -> Result<Vec<SetlistEntry>, AppError> {
        if setlists.is_empty() {
            return Err(AppError::BadRequest("No setlists given".into()));
        }

        let ids: Vec<i64> = setlists.iter().map(|setlist| setlist.id).collect();
        let entries = self.entries.list_by_setlists(&ids).await?;
        ensure_ranked(entries)
    }

    /// Persists a batch of entries that all belong to one setlist. An empty batch is a no-op.
    pub async fn store_batch(&self, entries: &[NewSetlistEntry], principal: &User) -> Result<Vec<SetlistEntry>, AppError> {
        self.check_store(entries, principal).await?;

        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let setlist_id = entries[0].setlist_id;
        self.ensure_setlist(setlist_id).await?;

        let created = self.entries.create_batch(entries).await?;
        info!("Created {} entries in setlist {}", created.len(), setlist_id);
        Ok(created)
    }

    /// Same rules as `store_batch`, and every entry must already exist in the
    /// setlist it is updated in. An empty batch is a no-op.
    pub async fn update_batch(&self, entries: &[SetlistEntry], principal: &User) -> Result<Vec<SetlistEntry>, AppError> {
        self.check_update(entries, principal).await?;

        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let setlist_id = entries[0].setlist_id;
        self.ensure_setlist(setlist_id).await?;

        let updated = self.entries.update_batch(entries).await?;
        info!("Updated {} entries in setlist {}", updated.len(), setlist_id);
        Ok(updated)
    }

    pub async fn remove_batch(&self, setlist: &Setlist, ids: &[i64], principal: &User) -> Result<(), AppError> {
        self.check_remove(setlist, ids, principal).await?;

        if ids.is_empty() {
            return Ok(());
        }

        self.entries.delete_batch(ids).await?;
        info!("Removed {} entries from setlist {}", ids.len(), setlist.id);
        Ok(())
    }

    pub async fn remove_by_setlist(&self, setlist: &Setlist, principal: &User) -> Result<(), AppError> {
        ensure_admin_or_creator(setlist, principal)?;

        let ids: Vec<i64> = self.entries.list_by_setlists(&[setlist.id]).await?
            .into_iter()
            .map(|entry| entry.id)
            .collect();

        self.entries.delete_batch(&ids).await?;
        info!("Removed all {} entries from setlist {}", ids.len(), setlist.id);
        Ok(())
    }

    /// Every rule of `store_batch` except the setlist lookup, without writing.
    /// Lets a caller vet entries for a setlist that is not stored yet.
    pub async fn check_store(&self, entries: &[NewSetlistEntry], principal: &User) -> Result<(), AppError> {
        ensure_editor(principal)?;
        self.check_fields(entries).await
    }

    /// Every rule of `update_batch` except the setlist lookup, without writing.
    pub async fn check_update(&self, entries: &[SetlistEntry], principal: &User) -> Result<(), AppError> {
        ensure_editor(principal)?;
        self.check_fields(entries).await?;

        for entry in entries {
            let stored = self.fetch_by_id(entry.id).await?;
            if stored.setlist_id != entry.setlist_id {
                warn!("User {} tried to move entry {} out of setlist {}", principal.id, stored.id, stored.setlist_id);
                return Err(AppError::BadRequest(format!(
                    "entry {} does not belong to setlist {}",
                    stored.id, entry.setlist_id
                )));
            }
        }
        Ok(())
    }

    /// Every rule of `remove_batch`, without writing.
    pub async fn check_remove(&self, setlist: &Setlist, ids: &[i64], principal: &User) -> Result<(), AppError> {
        ensure_admin_or_creator(setlist, principal)?;

        for id in ids {
            let entry = self.fetch_by_id(*id).await?;
            if entry.setlist_id != setlist.id {
                return Err(AppError::BadRequest(format!(
                    "entry {} does not belong to setlist {}",
                    entry.id, setlist.id
                )));
            }
        }
        Ok(())
    }

    /// Transpose bounds and the shared setlist are checked over the whole batch
    /// before any song is looked up.
    async fn check_fields<E: EntryFields + Sync>(&self, entries: &[E]) -> Result<(), AppError> {
        let Some(first) = entries.first() else {
            return Ok(());
        };

        if entries.iter().any(|entry| !is_valid_transpose(entry.transpose())) {
            return Err(AppError::BadRequest(format!(
                "Transpose must be between {} and {}",
                TRANSPOSE_MIN, TRANSPOSE_MAX
            )));
        }

        if entries.iter().any(|entry| entry.setlist_id() != first.setlist_id()) {
            return Err(AppError::BadRequest("SetlistID must be the same across entries".into()));
        }

        for entry in entries {
            if self.songs.find_by_id(entry.song_id()).await?.is_none() {
                return Err(AppError::record_not_found("song_id", entry.song_id()));
            }
        }
        Ok(())
    }

    async fn ensure_setlist(&self, setlist_id: i64) -> Result<(), AppError> {
        match self.setlists.find_by_id(setlist_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::record_not_found("setlist_id", setlist_id)),
        }
    }
}

fn ensure_editor(principal: &User) -> Result<(), AppError> {
    if !principal.has_clearance(Permission::Editor) {
        warn!("User {} denied setlist entry mutation", principal.id);
        return Err(AppError::NotAuthorized("Invalid authorization".into()));
    }
    Ok(())
}

fn ensure_admin_or_creator(setlist: &Setlist, principal: &User) -> Result<(), AppError> {
    if !principal.has_clearance(Permission::Admin) && setlist.creator_id != principal.id {
        warn!("User {} denied entry removal in setlist {}", principal.id, setlist.id);
        return Err(AppError::NotAuthorized("Invalid authorization".into()));
    }
    Ok(())
}

fn ensure_ranked(entries: Vec<SetlistEntry>) -> Result<Vec<SetlistEntry>, AppError> {
    if !ranks_non_decreasing(&entries) {
        error!("Setlist entries returned out of rank order");
        return Err(AppError::InternalWithMsg("setlist entries are not ordered by rank".into()));
    }
    Ok(entries)
}
