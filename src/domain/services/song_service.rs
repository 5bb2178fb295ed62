use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::models::{
    song::{is_valid_key, NewSong, Song, SongFilter},
    user::{Permission, User},
};
use crate::domain::ports::{BundleRepository, SongRepository, UserRepository};
use crate::domain::services::chord_sheet;
use crate::error::AppError;

pub struct SongService {
    users: Arc<dyn UserRepository>,
    songs: Arc<dyn SongRepository>,
    bundles: Arc<dyn BundleRepository>,
}

impl SongService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        songs: Arc<dyn SongRepository>,
        bundles: Arc<dyn BundleRepository>,
    ) -> Self {
        Self { users, songs, bundles }
    }

    pub async fn fetch_by_id(&self, id: i64) -> Result<Song, AppError> {
        self.songs.find_by_id(id).await?
            .ok_or_else(|| AppError::record_not_found("id", id))
    }

    pub async fn fetch_all(&self) -> Result<Vec<Song>, AppError> {
        self.songs.list().await
    }

    pub async fn fetch(&self, filter: &SongFilter) -> Result<Vec<Song>, AppError> {
        if filter.is_empty() {
            return self.songs.list().await;
        }
        self.songs.list_filtered(filter).await
    }

    pub async fn store(&self, song: &NewSong, principal: &User) -> Result<Song, AppError> {
        if !principal.has_clearance(Permission::Member) {
            warn!("User {} denied song creation", principal.id);
            return Err(AppError::NotAuthorized("not authorized to create songs".into()));
        }

        if song.creator_id != principal.id {
            return Err(AppError::BadRequest("cannot create a song with different creator".into()));
        }

        validate_contents(&song.key, &song.chord_sheet)?;
        self.ensure_bundle(song.bundle_id).await?;

        let created = self.songs.create(song).await?;
        info!("Song created: {} ({})", created.id, created.title);
        Ok(created)
    }

    pub async fn update(&self, song: &Song, principal: &User) -> Result<Song, AppError> {
        self.ensure_editor_or_creator(song.id, principal).await?;

        validate_contents(&song.key, &song.chord_sheet.0)?;
        self.ensure_bundle(song.bundle_id).await?;

        if self.users.find_by_id(song.creator_id).await?.is_none() {
            return Err(AppError::record_not_found("creator_id", song.creator_id));
        }

        let updated = self.songs.update(song).await?;
        info!("Song updated: {}", updated.id);
        Ok(updated)
    }

    pub async fn remove(&self, id: i64, principal: &User) -> Result<(), AppError> {
        self.ensure_editor_or_creator(id, principal).await?;

        self.songs.delete(id).await?;
        info!("Song removed: {}", id);
        Ok(())
    }

    /// Editors may touch any song; members only the ones they created.
    async fn ensure_editor_or_creator(&self, song_id: i64, principal: &User) -> Result<(), AppError> {
        if principal.has_clearance(Permission::Editor) {
            return Ok(());
        }

        let current = self.fetch_by_id(song_id).await?;
        if current.creator_id != principal.id || !principal.has_clearance(Permission::Member) {
            warn!("User {} denied access to song {}", principal.id, song_id);
            return Err(AppError::NotAuthorized("user is neither an editor nor creator of the song".into()));
        }

        Ok(())
    }

    async fn ensure_bundle(&self, bundle_id: i64) -> Result<(), AppError> {
        match self.bundles.find_by_id(bundle_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::record_not_found("bundle_id", bundle_id)),
        }
    }
}

fn validate_contents(key: &str, sheet: &serde_json::Value) -> Result<(), AppError> {
    if !is_valid_key(key) {
        return Err(AppError::BadRequest("invalid key".into()));
    }
    chord_sheet::validate(sheet)
}
