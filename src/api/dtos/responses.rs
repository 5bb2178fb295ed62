use crate::domain::models::{setlist::Setlist, setlist_entry::SetlistEntry, user::User};
use serde::Serialize;

#[derive(Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub access: String,
    pub refresh: String,
}

#[derive(Serialize)]
pub struct SetlistWithEntries {
    #[serde(flatten)]
    pub setlist: Setlist,
    pub entries: Vec<SetlistEntry>,
}

impl SetlistWithEntries {
    /// Attaches to every setlist the entries that belong to it, keeping rank order.
    pub fn group(setlists: Vec<Setlist>, entries: Vec<SetlistEntry>) -> Vec<Self> {
        setlists
            .into_iter()
            .map(|setlist| {
                let entries = entries.iter()
                    .filter(|entry| entry.setlist_id == setlist.id)
                    .cloned()
                    .collect();
                Self { setlist, entries }
            })
            .collect()
    }
}
