pub mod bundle;
pub mod health;
pub mod me;
pub mod role;
pub mod setlist;
pub mod setlist_role;
pub mod song;
pub mod token;
pub mod user;
pub mod user_role;
