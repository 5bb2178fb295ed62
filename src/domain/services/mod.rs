pub mod bundle_service;
pub mod chord_sheet;
pub mod jwt;
pub mod password;
pub mod role_service;
pub mod setlist_entry_service;
pub mod setlist_role_service;
pub mod setlist_service;
pub mod song_service;
pub mod token_service;
pub mod user_role_service;
pub mod user_service;
