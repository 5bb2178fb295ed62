use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};

pub const TRANSPOSE_MIN: i16 = -5;
pub const TRANSPOSE_MAX: i16 = 6;

pub fn is_valid_transpose(transpose: i16) -> bool {
    (TRANSPOSE_MIN..=TRANSPOSE_MAX).contains(&transpose)
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct SetlistEntry {
    pub id: i64,
    pub song_id: i64,
    pub setlist_id: i64,
    pub transpose: i16,
    pub notes: String,
    pub arrangement: Json<Vec<String>>,
    pub rank: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSetlistEntry {
    pub song_id: i64,
    pub setlist_id: i64,
    pub transpose: i16,
    pub notes: String,
    pub arrangement: Vec<String>,
    pub rank: i64,
}

/// Shared view over new and persisted entries so batch validation runs once.
pub trait EntryFields {
    fn song_id(&self) -> i64;
    fn setlist_id(&self) -> i64;
    fn transpose(&self) -> i16;
}

impl EntryFields for NewSetlistEntry {
    fn song_id(&self) -> i64 { self.song_id }
    fn setlist_id(&self) -> i64 { self.setlist_id }
    fn transpose(&self) -> i16 { self.transpose }
}

impl EntryFields for SetlistEntry {
    fn song_id(&self) -> i64 { self.song_id }
    fn setlist_id(&self) -> i64 { self.setlist_id }
    fn transpose(&self) -> i16 { self.transpose }
}

/// True when ranks never decrease in the order given.
pub fn ranks_non_decreasing(entries: &[SetlistEntry]) -> bool {
    entries.windows(2).all(|pair| pair[0].rank <= pair[1].rank)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(rank: i64) -> SetlistEntry {
        SetlistEntry {
            id: rank,
            song_id: 1,
            setlist_id: 1,
            transpose: 0,
            notes: String::new(),
            arrangement: Json(vec![]),
            rank,
        }
    }

    #[test]
    fn transpose_bounds_are_inclusive() {
        assert!(is_valid_transpose(TRANSPOSE_MIN));
        assert!(is_valid_transpose(TRANSPOSE_MAX));
        assert!(is_valid_transpose(0));
        assert!(!is_valid_transpose(TRANSPOSE_MIN - 1));
        assert!(!is_valid_transpose(TRANSPOSE_MAX + 1));
    }

    #[test]
    fn rank_ordering() {
        assert!(ranks_non_decreasing(&[]));
        assert!(ranks_non_decreasing(&[entry(100)]));
        assert!(ranks_non_decreasing(&[entry(100), entry(200)]));
        assert!(ranks_non_decreasing(&[entry(100), entry(100), entry(300)]));
        assert!(!ranks_non_decreasing(&[entry(300), entry(200)]));
        assert!(!ranks_non_decreasing(&[entry(100), entry(300), entry(200)]));
    }
}
