use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SyncError>;

/// Fatal failures of a sync run.
///
/// Individual playlist toggles never produce a `SyncError`; they are reported
/// as `false` and tallied by the caller.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("could not parse a playlist ID from '{0}'")]
    InvalidPlaylistId(String),

    #[error("invalid JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("GET {url} failed with {status}: {body}")]
    Fetch {
        url: String,
        status: u16,
        body: String,
    },

    #[error("could not find playlist.downloadURL for playlist {0}")]
    MissingManifestUrl(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("property store {path}: {source}")]
    Store {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("property store is corrupt: {0}")]
    StoreFormat(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}
