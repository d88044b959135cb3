use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Omnivore's `source` tag for saves that come through the public API.
pub const SAVE_SOURCE: &str = "api";

/// A bookmark as returned by readeck's `/api/bookmarks` listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Bookmark {
    pub url: String,
    pub created: String,
    #[serde(default)]
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub name: String,
}

/// The `SaveUrlInput` Omnivore expects for a single save.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePayload {
    pub client_request_id: Uuid,
    pub url: String,
    pub source: &'static str,
    pub saved_at: String,
    pub labels: Vec<Label>,
}

impl SavePayload {
    /// Every call mints a new `client_request_id`, so resubmitting a bookmark
    /// is never deduplicated on Omnivore's side.
    pub fn from_bookmark(bookmark: &Bookmark) -> Self {
        SavePayload {
            client_request_id: Uuid::new_v4(),
            url: bookmark.url.clone(),
            source: SAVE_SOURCE,
            saved_at: bookmark.created.clone(),
            labels: bookmark
                .labels
                .iter()
                .map(|name| Label { name: name.clone() })
                .collect(),
        }
    }
}
