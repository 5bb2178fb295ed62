use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A node in the bundle tree. `parent_id == 0` marks a root.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Bundle {
    pub id: i64,
    pub name: String,
    pub parent_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewBundle {
    pub name: String,
    #[serde(default)]
    pub parent_id: i64,
}
