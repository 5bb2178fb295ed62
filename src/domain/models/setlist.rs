use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Setlist {
    pub id: i64,
    pub name: String,
    pub creator_id: i64,
    pub deadline: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSetlist {
    pub name: String,
    pub creator_id: i64,
    pub deadline: DateTime<Utc>,
}
