use tabled::Table;

use crate::{
    beatsaver::auth,
    cli::{build_client, open_session},
    config, error,
    error::Result,
    info, success,
    sync::{self, SyncPlan, SyncReport},
    types::SearchFilter,
    utils, warning,
};

/// Per-invocation overrides of the configured search.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    pub pages: Option<u32>,
    pub query: Option<String>,
    pub leaderboard: Option<String>,
    pub sort_order: Option<String>,
    pub args: Option<String>,
}

impl SyncOptions {
    pub(crate) fn into_plan(self, playlist: String) -> Result<SyncPlan> {
        let defaults = config::search_filter();
        Ok(SyncPlan {
            playlist,
            pages: match self.pages {
                Some(pages) => pages,
                None => config::pages()?,
            },
            filter: SearchFilter {
                query: self.query.unwrap_or(defaults.query),
                leaderboard: self.leaderboard.unwrap_or(defaults.leaderboard),
                sort_order: self.sort_order.unwrap_or(defaults.sort_order),
                extra_args: self.args.unwrap_or(defaults.extra_args),
            },
            pacing: config::pacing()?,
        })
    }
}

/// Empties `playlist` and refills it from the catalog search.
pub async fn sync(playlist: String, options: SyncOptions) {
    let plan = match options.into_plan(playlist) {
        Ok(plan) => plan,
        Err(e) => error!("{}", e),
    };

    let mut session = match open_session().await {
        Ok(session) => session,
        Err(e) => error!("Failed to open property store: {}", e),
    };

    let client = match build_client() {
        Ok(client) => client,
        Err(e) => error!("{}", e),
    };

    match sync::sync_playlist(&client, &mut session, &plan).await {
        Ok(report) => print_report(&report),
        Err(e) => error!("Sync of playlist {} failed: {}", plan.playlist, e),
    }
}

/// Removes every song from `playlist`.
pub async fn drain(playlist: String) {
    let playlist_id = match sync::resolve_playlist(&playlist) {
        Ok(id) => id,
        Err(e) => error!("{}", e),
    };

    let pacing = match config::pacing() {
        Ok(pacing) => pacing,
        Err(e) => error!("{}", e),
    };

    let mut session = match open_session().await {
        Ok(session) => session,
        Err(e) => error!("Failed to open property store: {}", e),
    };

    let client = match build_client() {
        Ok(client) => client,
        Err(e) => error!("{}", e),
    };

    let cookie_header = match client
        .load_valid_cookie(&mut session)
        .await
        .and_then(|cookie| auth::cookie_header(&cookie))
    {
        Ok(header) => header,
        Err(e) => error!("{}", e),
    };

    if let Err(e) = sync::drain_playlist(&client, &playlist_id, &cookie_header, &pacing).await {
        error!("Failed to empty playlist {}: {}", playlist_id, e);
    }
}

pub(crate) fn print_report(report: &SyncReport) {
    let fill = &report.fill;
    success!(
        "Playlist {}: removed {}, added {}, skipped {}, failed {}",
        report.playlist_id,
        report.drain.removed,
        fill.added.len(),
        fill.skipped.len(),
        fill.failed.len()
    );

    if report.drain.failed > 0 {
        warning!("{} songs could not be removed", report.drain.failed);
    }

    if !fill.failed.is_empty() {
        if fill.failed.len() > utils::FAILURE_DETAIL_LIMIT {
            info!(
                "Showing the first {} of {} failures",
                utils::FAILURE_DETAIL_LIMIT,
                fill.failed.len()
            );
        }
        let table = Table::new(utils::failure_rows(&fill.failed));
        println!("{}", table);
    }
}
