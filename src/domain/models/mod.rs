pub mod auth;
pub mod bundle;
pub mod role;
pub mod setlist;
pub mod setlist_entry;
pub mod setlist_role;
pub mod song;
pub mod user;
pub mod user_role;
