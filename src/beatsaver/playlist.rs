use crate::{
    beatsaver::{BeatSaver, Clock, Transport},
    error::{Result, SyncError},
    types::{
        AddResponse, PlaylistId, PlaylistManifest, PlaylistMetaResponse, TogglePlaylistRequest,
        TogglePlaylistResponse,
    },
    utils, warning,
};

impl<T: Transport, C: Clock> BeatSaver<T, C> {
    /// Resolves the manifest URL of a playlist from its metadata.
    pub async fn manifest_url(&self, playlist_id: &PlaylistId) -> Result<String> {
        let url = format!("{}/playlists/id/{}", self.endpoints.api, playlist_id);
        let meta: PlaylistMetaResponse = self.fetch_json(&url).await?;

        meta.playlist
            .and_then(|p| p.download_url)
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| SyncError::MissingManifestUrl(playlist_id.to_string()))
    }

    /// Fetches the current song keys of a playlist. Entries without a key are
    /// kept as `None` so the caller can count them.
    pub async fn playlist_songs(&self, playlist_id: &PlaylistId) -> Result<Vec<Option<String>>> {
        let download_url = self.manifest_url(playlist_id).await?;
        let manifest: PlaylistManifest = self.fetch_json(&download_url).await?;

        Ok(manifest.song_keys())
    }

    /// Sets whether `map_key` is in the playlist.
    ///
    /// Only a response body with `"success": true` counts. 5xx, 429 and
    /// transport errors are retried with exponential backoff; anything else
    /// fails immediately. Failure is logged and reported as `false`.
    pub async fn toggle(
        &self,
        playlist_id: &PlaylistId,
        map_key: &str,
        in_playlist: bool,
        cookie_header: &str,
    ) -> bool {
        let url = self.toggle_url(playlist_id);
        let payload = TogglePlaylistRequest {
            map_id: map_key.to_string(),
            in_playlist,
        };

        for attempt in 0..=self.retry.retries {
            let (code, body, retryable) = match self
                .transport
                .post_json(&url, &payload, cookie_header)
                .await
            {
                Ok(response) => {
                    let accepted = serde_json::from_str::<TogglePlaylistResponse>(&response.body)
                        .ok()
                        .and_then(|r| r.success)
                        .unwrap_or(false);
                    if accepted {
                        return true;
                    }
                    let retryable = utils::is_transient(response.status);
                    (response.status.to_string(), response.body, retryable)
                }
                Err(e) => ("-".to_string(), e.to_string(), true),
            };

            if !retryable || attempt == self.retry.retries {
                warning!(
                    "Toggle FAIL mapId={} inPlaylist={} code={} body={}",
                    map_key,
                    in_playlist,
                    code,
                    body
                );
                return false;
            }

            self.clock
                .sleep(utils::backoff_delay(self.retry.base_sleep, attempt))
                .await;
        }

        false
    }

    /// Adds `map_key` to the playlist with a single request.
    ///
    /// The caller classifies the outcome by status; see [`utils::classify_add`].
    pub async fn add(
        &self,
        playlist_id: &PlaylistId,
        map_key: &str,
        cookie_header: &str,
    ) -> AddResponse {
        let url = self.toggle_url(playlist_id);
        let payload = TogglePlaylistRequest {
            map_id: map_key.to_string(),
            in_playlist: true,
        };

        match self
            .transport
            .post_json(&url, &payload, cookie_header)
            .await
        {
            Ok(response) => AddResponse {
                status: Some(response.status),
                body: response.body,
            },
            Err(e) => AddResponse {
                status: None,
                body: e.to_string(),
            },
        }
    }

    fn toggle_url(&self, playlist_id: &PlaylistId) -> String {
        format!(
            "{}/api/playlists/id/{}/add",
            self.endpoints.web,
            urlencoding::encode(playlist_id.as_str())
        )
    }
}
