use std::sync::Arc;
use crate::domain::ports::{
    BundleRepository, RoleRepository, SetlistEntryRepository, SetlistRepository,
    SetlistRoleRepository, SongRepository, TokenRepository, UserRepository, UserRoleRepository,
};
use crate::domain::services::{
    bundle_service::BundleService, role_service::RoleService,
    setlist_entry_service::SetlistEntryService, setlist_role_service::SetlistRoleService,
    setlist_service::SetlistService, song_service::SongService, token_service::TokenService,
    user_role_service::UserRoleService, user_service::UserService,
};
use crate::config::Config;

/// One storage backend's worth of repositories.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub roles: Arc<dyn RoleRepository>,
    pub user_roles: Arc<dyn UserRoleRepository>,
    pub bundles: Arc<dyn BundleRepository>,
    pub songs: Arc<dyn SongRepository>,
    pub setlists: Arc<dyn SetlistRepository>,
    pub setlist_entries: Arc<dyn SetlistEntryRepository>,
    pub setlist_roles: Arc<dyn SetlistRoleRepository>,
    pub tokens: Arc<dyn TokenRepository>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_service: Arc<UserService>,
    pub role_service: Arc<RoleService>,
    pub user_role_service: Arc<UserRoleService>,
    pub bundle_service: Arc<BundleService>,
    pub song_service: Arc<SongService>,
    pub setlist_service: Arc<SetlistService>,
    pub setlist_entry_service: Arc<SetlistEntryService>,
    pub setlist_role_service: Arc<SetlistRoleService>,
    pub token_service: Arc<TokenService>,
}

impl AppState {
    pub fn new(config: Config, repos: Repositories) -> Self {
        Self {
            user_service: Arc::new(UserService::new(repos.users.clone(), repos.roles.clone(), repos.user_roles.clone())),
            role_service: Arc::new(RoleService::new(repos.roles.clone(), repos.users.clone(), repos.user_roles.clone())),
            user_role_service: Arc::new(UserRoleService::new(repos.user_roles.clone())),
            bundle_service: Arc::new(BundleService::new(repos.bundles.clone())),
            song_service: Arc::new(SongService::new(repos.users.clone(), repos.songs.clone(), repos.bundles.clone())),
            setlist_service: Arc::new(SetlistService::new(repos.users.clone(), repos.setlists.clone())),
            setlist_entry_service: Arc::new(SetlistEntryService::new(
                repos.setlist_entries.clone(),
                repos.setlists.clone(),
                repos.songs.clone(),
            )),
            setlist_role_service: Arc::new(SetlistRoleService::new(
                repos.setlist_roles.clone(),
                repos.setlists.clone(),
                repos.user_roles.clone(),
            )),
            token_service: Arc::new(TokenService::new(repos.tokens.clone(), repos.users.clone(), &config)),
            config,
        }
    }
}
