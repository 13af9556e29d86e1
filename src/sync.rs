//! The drain-then-fill playlist workflow.
//!
//! A sync run first removes every song currently in the playlist, then walks
//! the catalog search pages and adds each result. Both phases continue past
//! individual item failures; only errors that make the run meaningless
//! (unresolvable playlist, failed metadata or search fetch, missing cookie)
//! abort it.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    beatsaver::{BeatSaver, Clock, Transport, auth},
    error::{Result, SyncError},
    info,
    management::SessionManager,
    success,
    types::{
        AddOutcome, DrainOutcome, FailedItem, Pacing, PlaylistId, SearchFilter, SkippedItem,
        SyncOutcome,
    },
    utils, warning,
};

/// Everything one sync run needs besides the client and session.
#[derive(Debug, Clone)]
pub struct SyncPlan {
    pub playlist: String,
    pub pages: u32,
    pub filter: SearchFilter,
    pub pacing: Pacing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub playlist_id: PlaylistId,
    pub drain: DrainOutcome,
    pub fill: SyncOutcome,
}

pub fn resolve_playlist(input: &str) -> Result<PlaylistId> {
    utils::parse_playlist_id(input).ok_or_else(|| SyncError::InvalidPlaylistId(input.to_string()))
}

/// Runs both phases against one playlist with a validated session cookie.
pub async fn sync_playlist<T: Transport, C: Clock>(
    client: &BeatSaver<T, C>,
    session: &mut SessionManager,
    plan: &SyncPlan,
) -> Result<SyncReport> {
    let playlist_id = resolve_playlist(&plan.playlist)?;
    let cookie = client.load_valid_cookie(session).await?;
    let cookie_header = auth::cookie_header(&cookie)?;

    let drain = drain_playlist(client, &playlist_id, &cookie_header, &plan.pacing).await?;
    let fill = fill_playlist(
        client,
        &playlist_id,
        &cookie_header,
        plan.pages,
        &plan.filter,
        &plan.pacing,
    )
    .await?;

    Ok(SyncReport {
        playlist_id,
        drain,
        fill,
    })
}

/// Removes every song currently in the playlist.
///
/// Pauses for `pacing.batch_sleep` after each `pacing.batch_size` removals,
/// except after the last one.
pub async fn drain_playlist<T: Transport, C: Clock>(
    client: &BeatSaver<T, C>,
    playlist_id: &PlaylistId,
    cookie_header: &str,
    pacing: &Pacing,
) -> Result<DrainOutcome> {
    let songs = client.playlist_songs(playlist_id).await?;
    let mut outcome = DrainOutcome::default();

    if songs.is_empty() {
        info!("No songs found in playlist {}", playlist_id);
        return Ok(outcome);
    }

    info!(
        "Removing {} songs from playlist {}...",
        songs.len(),
        playlist_id
    );

    let pb = ProgressBar::new(songs.len() as u64);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner:.blue} [{bar:30.blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("=> ").tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb.enable_steady_tick(Duration::from_millis(100));

    for (i, song) in songs.iter().enumerate() {
        match song {
            Some(key) => {
                pb.set_message(key.clone());
                if client.toggle(playlist_id, key, false, cookie_header).await {
                    outcome.removed += 1;
                } else {
                    outcome.failed += 1;
                }
            }
            None => {
                outcome.failed += 1;
                pb.suspend(|| warning!("Skip index {}: no song key", i));
            }
        }
        pb.inc(1);

        if utils::should_pause_after(i, songs.len(), pacing.batch_size) {
            client.clock().sleep(pacing.batch_sleep).await;
        }
    }

    pb.finish_and_clear();
    success!(
        "Removed {} songs from playlist {} ({} failed)",
        outcome.removed,
        playlist_id,
        outcome.failed
    );

    Ok(outcome)
}

/// Adds every search result from pages `0..pages` to the playlist.
pub async fn fill_playlist<T: Transport, C: Clock>(
    client: &BeatSaver<T, C>,
    playlist_id: &PlaylistId,
    cookie_header: &str,
    pages: u32,
    filter: &SearchFilter,
    pacing: &Pacing,
) -> Result<SyncOutcome> {
    let mut outcome = SyncOutcome::default();

    for page in 0..pages {
        let items = client.fetch_page(page, filter).await?;
        info!("Page {}: adding {} maps", page, items.len());

        for item in items {
            let response = client.add(playlist_id, &item.key, cookie_header).await;
            match utils::classify_add(response.status, &response.body) {
                AddOutcome::Added => outcome.added.push(item.key),
                AddOutcome::Skipped { reason } => outcome.skipped.push(SkippedItem {
                    map_id: item.key,
                    reason,
                }),
                AddOutcome::Failed { status, body } => outcome.failed.push(FailedItem {
                    map_id: item.key,
                    status,
                    body,
                }),
            }

            client.clock().sleep(pacing.post_sleep).await;
        }

        client.clock().sleep(pacing.page_sleep).await;
    }

    Ok(outcome)
}
