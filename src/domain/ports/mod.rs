use crate::domain::models::{
    auth::RefreshTokenRecord,
    bundle::{Bundle, NewBundle},
    role::{NewRole, Role},
    setlist::{NewSetlist, Setlist},
    setlist_entry::{NewSetlistEntry, SetlistEntry},
    setlist_role::{NewSetlistRole, SetlistRole},
    song::{NewSong, Song, SongFilter},
    user::{NewUser, User},
    user_role::{NewUserRole, UserRole},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// `user.password` must already hold the password hash.
    async fn create(&self, user: &NewUser) -> Result<User, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn list(&self) -> Result<Vec<User>, AppError>;
    async fn update(&self, user: &User) -> Result<User, AppError>;
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn create(&self, role: &NewRole) -> Result<Role, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Role>, AppError>;
    async fn list(&self) -> Result<Vec<Role>, AppError>;
    async fn update(&self, role: &Role) -> Result<Role, AppError>;
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

#[async_trait]
pub trait UserRoleRepository: Send + Sync {
    async fn create_batch(&self, user_roles: &[NewUserRole]) -> Result<Vec<UserRole>, AppError>;
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<UserRole>, AppError>;
    async fn list(&self) -> Result<Vec<UserRole>, AppError>;
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<UserRole>, AppError>;
    async fn update_batch(&self, user_roles: &[UserRole]) -> Result<(), AppError>;
    async fn delete_by_user(&self, user_id: i64) -> Result<(), AppError>;
    async fn delete_by_role(&self, role_id: i64) -> Result<(), AppError>;
}

#[async_trait]
pub trait BundleRepository: Send + Sync {
    async fn create(&self, bundle: &NewBundle) -> Result<Bundle, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Bundle>, AppError>;
    async fn list(&self) -> Result<Vec<Bundle>, AppError>;
    /// Bundles that no live bundle names as its parent.
    async fn list_leaves(&self) -> Result<Vec<Bundle>, AppError>;
    async fn update(&self, bundle: &Bundle) -> Result<Bundle, AppError>;
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

#[async_trait]
pub trait SongRepository: Send + Sync {
    async fn create(&self, song: &NewSong) -> Result<Song, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Song>, AppError>;
    async fn list(&self) -> Result<Vec<Song>, AppError>;
    async fn list_filtered(&self, filter: &SongFilter) -> Result<Vec<Song>, AppError>;
    async fn update(&self, song: &Song) -> Result<Song, AppError>;
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

#[async_trait]
pub trait SetlistRepository: Send + Sync {
    async fn create(&self, setlist: &NewSetlist) -> Result<Setlist, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Setlist>, AppError>;
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Setlist>, AppError>;
    async fn list(&self) -> Result<Vec<Setlist>, AppError>;
    async fn list_by_timeframe(&self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Result<Vec<Setlist>, AppError>;
    async fn update(&self, setlist: &Setlist) -> Result<Setlist, AppError>;
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

#[async_trait]
pub trait SetlistEntryRepository: Send + Sync {
    async fn create_batch(&self, entries: &[NewSetlistEntry]) -> Result<Vec<SetlistEntry>, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<SetlistEntry>, AppError>;
    /// Ordered by rank.
    async fn list(&self) -> Result<Vec<SetlistEntry>, AppError>;
    /// Ordered by rank.
    async fn list_by_setlists(&self, setlist_ids: &[i64]) -> Result<Vec<SetlistEntry>, AppError>;
    async fn update_batch(&self, entries: &[SetlistEntry]) -> Result<Vec<SetlistEntry>, AppError>;
    async fn delete_batch(&self, ids: &[i64]) -> Result<(), AppError>;
}

#[async_trait]
pub trait SetlistRoleRepository: Send + Sync {
    async fn create_batch(&self, setlist_roles: &[NewSetlistRole]) -> Result<Vec<SetlistRole>, AppError>;
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<SetlistRole>, AppError>;
    async fn list_by_setlists(&self, setlist_ids: &[i64]) -> Result<Vec<SetlistRole>, AppError>;
    async fn delete_batch(&self, ids: &[i64]) -> Result<(), AppError>;
}

#[async_trait]
pub trait TokenRepository: Send + Sync {
    async fn create(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<RefreshTokenRecord>, AppError>;
    async fn delete(&self, token_hash: &str) -> Result<(), AppError>;
    async fn delete_by_user(&self, user_id: i64) -> Result<(), AppError>;
}
