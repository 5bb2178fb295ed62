use crate::domain::models::{setlist_role::NewSetlistRole, user::Permission};
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub profile_color: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// A refresh token the client still holds, reused while it is valid.
    pub refresh: Option<String>,
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Deserialize)]
pub struct UpdateMeRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub profile_color: String,
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct SetPermissionRequest {
    pub permission: Permission,
}

#[derive(Deserialize)]
pub struct UpdateRoleRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize)]
pub struct SetActiveRolesRequest {
    pub ids: Vec<i64>,
}

#[derive(Deserialize)]
pub struct UpdateBundleRequest {
    pub name: String,
    #[serde(default)]
    pub parent_id: i64,
}

#[derive(Deserialize)]
pub struct CreateSongRequest {
    pub bundle_id: i64,
    /// Defaults to the caller.
    pub creator_id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub key: String,
    pub bpm: i32,
    #[serde(default = "empty_object")]
    pub chord_sheet: Value,
}

#[derive(Deserialize)]
pub struct UpdateSongRequest {
    pub bundle_id: i64,
    pub creator_id: i64,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub key: String,
    pub bpm: i32,
    #[serde(default = "empty_object")]
    pub chord_sheet: Value,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

/// `?ids=1,2&bids=3&cids=&keys=A,Em&bpms=120&title=Ama`
#[derive(Deserialize, Default)]
pub struct SongQuery {
    pub ids: Option<String>,
    pub bids: Option<String>,
    pub cids: Option<String>,
    pub keys: Option<String>,
    pub bpms: Option<String>,
    pub title: Option<String>,
}

#[derive(Deserialize)]
pub struct EntryRequest {
    pub song_id: i64,
    #[serde(default)]
    pub transpose: i16,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub arrangement: Vec<String>,
    pub rank: Option<i64>,
}

#[derive(Deserialize)]
pub struct UpdatedEntryRequest {
    pub id: i64,
    pub song_id: i64,
    #[serde(default)]
    pub transpose: i16,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub arrangement: Vec<String>,
    pub rank: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreateSetlistRequest {
    pub name: String,
    /// Defaults to the caller.
    pub creator_id: Option<i64>,
    pub deadline: DateTime<Utc>,
    #[serde(default)]
    pub created_entries: Vec<EntryRequest>,
}

#[derive(Deserialize)]
pub struct UpdateSetlistRequest {
    pub name: String,
    pub creator_id: Option<i64>,
    pub deadline: DateTime<Utc>,
    #[serde(default)]
    pub created_entries: Vec<EntryRequest>,
    #[serde(default)]
    pub updated_entries: Vec<UpdatedEntryRequest>,
    #[serde(default)]
    pub deleted_entries: Vec<i64>,
}

#[derive(Deserialize, Default)]
pub struct TimeframeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateSetlistRolesRequest {
    pub setlist_roles: Vec<NewSetlistRole>,
}

/// `?ids=1,2,3`
#[derive(Deserialize, Default)]
pub struct IdsQuery {
    pub ids: Option<String>,
}

/// Splits a comma separated query value, ignoring blanks.
pub fn parse_list<T: std::str::FromStr>(name: &str, raw: Option<&str>) -> Result<Vec<T>, AppError> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<T>()
                .map_err(|_| AppError::BadRequest(format!("{} contains an invalid value: {}", name, part)))
        })
        .collect()
}

pub fn parse_time(name: &str, raw: Option<&str>) -> Result<Option<DateTime<Utc>>, AppError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(value) => DateTime::parse_from_rfc3339(value)
            .map(|time| Some(time.with_timezone(&Utc)))
            .map_err(|_| AppError::BadRequest(format!("{} must be an RFC 3339 timestamp", name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_lists() {
        let ids: Vec<i64> = parse_list("ids", Some("1, 2,,3")).unwrap();
        assert_eq!(ids, vec![1, 2, 3]);

        let none: Vec<i64> = parse_list("ids", None).unwrap();
        assert!(none.is_empty());

        assert!(parse_list::<i64>("ids", Some("1,x")).is_err());
    }

    #[test]
    fn parses_rfc3339_bounds() {
        assert_eq!(parse_time("from", None).unwrap(), None);
        assert_eq!(parse_time("from", Some("")).unwrap(), None);

        let parsed = parse_time("from", Some("2030-01-01T10:00:00+02:00")).unwrap().unwrap();
        assert_eq!(parsed.to_rfc3339(), "2030-01-01T08:00:00+00:00");

        assert!(parse_time("to", Some("tomorrow")).is_err());
    }
}
