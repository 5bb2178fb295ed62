use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct UserRole {
    pub id: i64,
    pub user_id: i64,
    pub role_id: i64,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUserRole {
    pub user_id: i64,
    pub role_id: i64,
    pub active: bool,
}

impl NewUserRole {
    pub fn inactive(user_id: i64, role_id: i64) -> Self {
        Self { user_id, role_id, active: false }
    }
}
