pub mod sqlite_bundle_repo;
pub mod sqlite_role_repo;
pub mod sqlite_setlist_entry_repo;
pub mod sqlite_setlist_repo;
pub mod sqlite_setlist_role_repo;
pub mod sqlite_song_repo;
pub mod sqlite_token_repo;
pub mod sqlite_user_repo;
pub mod sqlite_user_role_repo;

pub mod postgres_bundle_repo;
pub mod postgres_role_repo;
pub mod postgres_setlist_entry_repo;
pub mod postgres_setlist_repo;
pub mod postgres_setlist_role_repo;
pub mod postgres_song_repo;
pub mod postgres_token_repo;
pub mod postgres_user_repo;
pub mod postgres_user_role_repo;
