use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Clearance levels, totally ordered from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[repr(i32)]
pub enum Permission {
    #[default]
    Guest = 0,
    Member = 1,
    Editor = 2,
    Admin = 3,
}

impl Permission {
    pub fn meets_or_exceeds(self, required: Permission) -> bool {
        self >= required
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub permission: Permission,
    pub profile_color: String,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn has_clearance(&self, required: Permission) -> bool {
        self.permission.meets_or_exceeds(required)
    }
}

/// A user that has not been persisted yet. `password` is plaintext until
/// `UserService::store` replaces it with its hash.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub permission: Permission,
    #[serde(default)]
    pub profile_color: String,
}

#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub profile_color: String,
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permissions_are_ordered() {
        assert!(Permission::Guest < Permission::Member);
        assert!(Permission::Member < Permission::Editor);
        assert!(Permission::Editor < Permission::Admin);
    }

    #[test]
    fn meets_or_exceeds_is_inclusive() {
        assert!(Permission::Editor.meets_or_exceeds(Permission::Editor));
        assert!(Permission::Admin.meets_or_exceeds(Permission::Member));
        assert!(!Permission::Member.meets_or_exceeds(Permission::Editor));
        assert!(!Permission::Guest.meets_or_exceeds(Permission::Member));
    }

    #[test]
    fn permission_serializes_as_uppercase_name() {
        assert_eq!(serde_json::to_string(&Permission::Editor).unwrap(), "\"EDITOR\"");
        let parsed: Permission = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(parsed, Permission::Admin);
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User {
            id: 1,
            email: "foo@bar.com".into(),
            password_hash: "$argon2id$secret".into(),
            first_name: "Foo".into(),
            last_name: "Bar".into(),
            permission: Permission::Member,
            profile_color: "FFFFFF".into(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["permission"], "MEMBER");
    }
}
