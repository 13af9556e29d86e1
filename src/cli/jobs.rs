use std::{path::Path, time::Duration};

use tokio::time::{MissedTickBehavior, interval};

use crate::{
    cli::{SyncOptions, build_client, open_session, sync::print_report},
    config, error,
    error::{Result, SyncError},
    info, success,
    sync::sync_playlist,
    types::SyncJob,
    warning,
};

/// Reads the job list. A missing file means no jobs.
pub async fn load_jobs(path: &Path) -> Result<Vec<SyncJob>> {
    match async_fs::read_to_string(path).await {
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(SyncError::Store {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Syncs every job in `jobs.json`. A failing job is reported and the
/// remaining jobs still run.
pub async fn run() {
    let path = config::jobs_path();
    let jobs = match load_jobs(&path).await {
        Ok(jobs) => jobs,
        Err(e) => error!("Failed to load jobs from {}: {}", path.display(), e),
    };

    if jobs.is_empty() {
        warning!("No jobs configured in {}", path.display());
        return;
    }

    let mut session = match open_session().await {
        Ok(session) => session,
        Err(e) => error!("Failed to open property store: {}", e),
    };

    let client = match build_client() {
        Ok(client) => client,
        Err(e) => error!("{}", e),
    };

    let mut failed_jobs = 0;
    for job in jobs {
        info!("Syncing playlist {} ({} pages)", job.playlist, job.pages);

        let options = SyncOptions {
            pages: Some(job.pages),
            args: Some(job.args),
            ..SyncOptions::default()
        };
        let plan = match options.into_plan(job.playlist) {
            Ok(plan) => plan,
            Err(e) => error!("{}", e),
        };

        match sync_playlist(&client, &mut session, &plan).await {
            Ok(report) => print_report(&report),
            Err(e) => {
                failed_jobs += 1;
                warning!("Sync of playlist {} failed: {}", plan.playlist, e);
            }
        }
    }

    if failed_jobs == 0 {
        success!("All jobs done.");
    } else {
        warning!("{} jobs failed.", failed_jobs);
    }
}

/// Longest accepted schedule interval, ten years.
pub const MAX_SCHEDULE_DAYS: u64 = 3650;

/// Length of a schedule interval of `days` days.
///
/// # Errors
///
/// Returns a configuration error for zero days or more than
/// [`MAX_SCHEDULE_DAYS`].
pub fn schedule_period(days: u64) -> Result<Duration> {
    const SECS_PER_DAY: u64 = 24 * 60 * 60;

    if days == 0 {
        return Err(SyncError::Config(
            "the schedule interval must be at least one day".to_string(),
        ));
    }

    days.checked_mul(SECS_PER_DAY)
        .filter(|_| days <= MAX_SCHEDULE_DAYS)
        .map(Duration::from_secs)
        .ok_or_else(|| {
            SyncError::Config(format!(
                "a schedule of {} days is too long (at most {})",
                days, MAX_SCHEDULE_DAYS
            ))
        })
}

/// Runs [`run`] now and then every `every_days` days until interrupted.
pub async fn schedule(every_days: Option<u64>) {
    let days = match every_days {
        Some(days) => days,
        None => match config::schedule_days() {
            Ok(days) => days,
            Err(e) => error!("{}", e),
        },
    };
    let period = match schedule_period(days) {
        Ok(period) => period,
        Err(e) => error!("{}", e),
    };

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        run().await;
        info!("Next run in {} days.", days);
    }
}
