use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow};
use serde_json::Value;

pub const VALID_KEYS: [&str; 34] = [
    "C", "D", "E", "F", "G", "A", "B",
    "Cm", "Dm", "Em", "Fm", "Gm", "Am", "Bm",
    "C#", "D#", "F#", "G#", "A#",
    "C#m", "D#m", "F#m", "G#m", "A#m",
    "Db", "Eb", "Gb", "Ab", "Bb",
    "Dbm", "Ebm", "Gbm", "Abm", "Bbm",
];

pub fn is_valid_key(key: &str) -> bool {
    VALID_KEYS.contains(&key)
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Song {
    pub id: i64,
    pub bundle_id: i64,
    pub creator_id: i64,
    pub title: String,
    pub subtitle: String,
    #[sqlx(rename = "song_key")]
    pub key: String,
    pub bpm: i32,
    pub chord_sheet: Json<Value>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSong {
    pub bundle_id: i64,
    pub creator_id: i64,
    pub title: String,
    pub subtitle: String,
    pub key: String,
    pub bpm: i32,
    pub chord_sheet: Value,
}

/// Conjunctive song filter. Only non-empty criteria restrict the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SongFilter {
    pub ids: Vec<i64>,
    pub bundle_ids: Vec<i64>,
    pub creator_ids: Vec<i64>,
    pub title: Option<String>,
    pub keys: Vec<String>,
    pub bpms: Vec<i32>,
}

impl SongFilter {
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
            && self.bundle_ids.is_empty()
            && self.creator_ids.is_empty()
            && self.title.as_deref().map_or(true, str::is_empty)
            && self.keys.is_empty()
            && self.bpms.is_empty()
    }

    /// `LIKE` pattern matching titles that start with the filter's title.
    /// Wildcards in the title match literally under `ESCAPE '\\'`.
    pub fn title_prefix_pattern(&self) -> Option<String> {
        let title = self.title.as_deref().filter(|title| !title.is_empty())?;

        let mut pattern = String::with_capacity(title.len() + 1);
        for c in title.chars() {
            if matches!(c, '\\' | '%' | '_') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        Some(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_key_is_valid() {
        for key in VALID_KEYS {
            assert!(is_valid_key(key), "{} should be valid", key);
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        for key in ["", "H", "c", "E#", "Fb", "B#m", "Cmaj", "A ", "Am7"] {
            assert!(!is_valid_key(key), "{:?} should be invalid", key);
        }
    }

    #[test]
    fn empty_filter_detection() {
        assert!(SongFilter::default().is_empty());
        assert!(SongFilter { title: Some(String::new()), ..Default::default() }.is_empty());
        assert!(!SongFilter { bpms: vec![120], ..Default::default() }.is_empty());
    }

    #[test]
    fn title_prefix_escapes_wildcards() {
        let filter = |title: &str| SongFilter { title: Some(title.to_string()), ..Default::default() };

        assert_eq!(SongFilter::default().title_prefix_pattern(), None);
        assert_eq!(filter("").title_prefix_pattern(), None);
        assert_eq!(filter("Ama").title_prefix_pattern().as_deref(), Some("Ama%"));
        assert_eq!(filter("_").title_prefix_pattern().as_deref(), Some("\\_%"));
        assert_eq!(filter("100%").title_prefix_pattern().as_deref(), Some("100\\%%"));
        assert_eq!(filter("a\\b").title_prefix_pattern().as_deref(), Some("a\\\\b%"));
    }
}
