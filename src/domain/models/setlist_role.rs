use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Grants the holder of a user-role access to a setlist.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct SetlistRole {
    pub id: i64,
    pub setlist_id: i64,
    pub user_role_id: i64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct NewSetlistRole {
    pub setlist_id: i64,
    pub user_role_id: i64,
}
