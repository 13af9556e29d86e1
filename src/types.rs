use std::{collections::BTreeMap, fmt, time::Duration};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabled::Tabled;

/// Name of the BeatSaver session cookie.
pub const SESSION_COOKIE_NAME: &str = "BMSESSIONID";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistId(String);

impl PlaylistId {
    /// Wraps an already validated, all-digit identifier.
    pub(crate) fn new(id: String) -> Self {
        PlaylistId(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// A single `Set-Cookie` attribute value. Flag attributes such as `HttpOnly`
/// carry no value and are stored as `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CookieValue {
    Text(String),
    Flag(bool),
}

/// Attributes of the session cookie, keyed by attribute name.
///
/// Persisted as a JSON object, e.g.
/// `{"BMSESSIONID":"abc","Expires":"Mon, 25 Aug 2025 18:46:59 GMT","HttpOnly":true}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionCookie(BTreeMap<String, CookieValue>);

impl SessionCookie {
    pub fn new(attributes: BTreeMap<String, CookieValue>) -> Self {
        SessionCookie(attributes)
    }

    pub fn attributes(&self) -> &BTreeMap<String, CookieValue> {
        &self.0
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(CookieValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        self.text(SESSION_COOKIE_NAME)
    }

    /// The raw `Expires` attribute, matched case-tolerantly.
    pub fn expires(&self) -> Option<&str> {
        self.text("Expires").or_else(|| self.text("expires"))
    }

    /// Renders the attributes back into `Set-Cookie` form (`k=v; Flag`).
    pub fn to_set_cookie(&self) -> String {
        self.0
            .iter()
            .map(|(name, value)| match value {
                CookieValue::Text(v) => format!("{}={}", name, v),
                CookieValue::Flag(_) => name.clone(),
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Response of `GET /playlists/id/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistMetaResponse {
    #[serde(default)]
    pub playlist: Option<PlaylistMeta>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistMeta {
    #[serde(default, rename = "downloadURL")]
    pub download_url: Option<String>,
}

/// The downloadable playlist document listing the current songs.
///
/// `songs` stays raw JSON so a malformed list or entry only affects the
/// songs it touches; see [`PlaylistManifest::song_keys`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistManifest {
    #[serde(default)]
    pub songs: Option<Value>,
}

impl PlaylistManifest {
    /// Key of every listed song, `None` for entries without a usable key.
    /// Anything but an array under `songs` lists no songs.
    pub fn song_keys(self) -> Vec<Option<String>> {
        match self.songs {
            Some(Value::Array(songs)) => songs
                .into_iter()
                .map(|song| {
                    serde_json::from_value::<ManifestSong>(song)
                        .ok()
                        .and_then(|s| s.key)
                        .filter(|k| !k.trim().is_empty())
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManifestSong {
    #[serde(default)]
    pub key: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchDoc {
    #[serde(default)]
    pub id: Option<String>,
}

/// A catalog search hit, identified by its map key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResultItem {
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TogglePlaylistRequest {
    #[serde(rename = "mapId")]
    pub map_id: String,
    #[serde(rename = "inPlaylist")]
    pub in_playlist: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TogglePlaylistResponse {
    #[serde(default)]
    pub success: Option<bool>,
}

/// Raw result of a single add request. `status` is `None` when the request
/// never produced a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddResponse {
    pub status: Option<u16>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Skipped { reason: String },
    Failed { status: Option<u16>, body: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    pub map_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedItem {
    pub map_id: String,
    pub status: Option<u16>,
    pub body: String,
}

#[derive(Tabled)]
pub struct FailureTableRow {
    pub map: String,
    pub status: String,
    pub body: String,
}

/// Result of the fill phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    pub added: Vec<String>,
    pub skipped: Vec<SkippedItem>,
    pub failed: Vec<FailedItem>,
}

/// Result of the drain phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainOutcome {
    pub removed: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    pub query: String,
    pub leaderboard: String,
    pub sort_order: String,
    /// Appended verbatim to the search URL, e.g. `&vivify=true`.
    pub extra_args: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub batch_size: usize,
    pub batch_sleep: Duration,
    pub post_sleep: Duration,
    pub page_sleep: Duration,
}

/// One entry of `jobs.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncJob {
    pub playlist: String,
    pub pages: u32,
    #[serde(default)]
    pub args: String,
}
