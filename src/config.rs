//! Configuration management for beatsync.
//!
//! Configuration values are read from environment variables, which may be
//! provided by a `.env` file in the local data directory. Every value has a
//! default, so a fresh install only needs credentials stored via `beatsync init`.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Command-line flags (where a command offers one)
//! 2. Environment variables
//! 3. `.env` file in the local data directory
//! 4. Application defaults

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use crate::{
    beatsaver::{Endpoints, RetryPolicy},
    error::{Result, SyncError},
    types::{Pacing, SearchFilter},
};

pub const DEFAULT_BEATSAVER_URL: &str = "https://beatsaver.com";
pub const DEFAULT_BEATSAVER_API_URL: &str = "https://api.beatsaver.com";

/// Returns the directory beatsync keeps its files in.
///
/// - Linux: `~/.local/share/beatsync`
/// - macOS: `~/Library/Application Support/beatsync`
/// - Windows: `%LOCALAPPDATA%/beatsync`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("beatsync");
    path
}

/// Loads environment variables from `.env` in the data directory.
///
/// Creates the data directory if needed. A missing `.env` file is not an
/// error since every setting has a default. Variables already set in the
/// process environment win over the file.
///
/// # Returns
///
/// Returns `Ok(())` once the file is loaded or found to be absent.
///
/// # Errors
///
/// This function will return an error if:
/// - The data directory cannot be created
/// - The `.env` file exists but cannot be read or parsed
///
/// # Example
///
/// ```
/// use beatsync::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<()> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir)
        .await
        .map_err(|e| SyncError::Store {
            path: dir.clone(),
            source: e,
        })?;

    let path = dir.join(".env");
    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| SyncError::Config(e.to_string()))?;
    }
    Ok(())
}

/// Location of the persisted key-value properties (credentials and cookie).
pub fn properties_path() -> PathBuf {
    data_dir().join("properties.json")
}

/// Location of the scheduled job list used by `beatsync run`.
pub fn jobs_path() -> PathBuf {
    data_dir().join("jobs.json")
}

/// Web host serving login and the playlist toggle endpoint (`BEATSAVER_URL`).
pub fn beatsaver_url() -> String {
    env_or_string("BEATSAVER_URL", DEFAULT_BEATSAVER_URL)
}

/// API host serving search and playlist metadata (`BEATSAVER_API_URL`).
pub fn beatsaver_apiurl() -> String {
    env_or_string("BEATSAVER_API_URL", DEFAULT_BEATSAVER_API_URL)
}

/// Returns the number of search pages to walk.
///
/// Reads `BEATSYNC_PAGES` (default 5). Pages are 0-based and hold 20 maps
/// each, so the default covers the top 100 results.
///
/// # Errors
///
/// Returns [`SyncError::Config`] if the variable is set but is not a
/// non-negative integer.
///
/// # Example
///
/// ```
/// let pages = beatsync::config::pages().unwrap_or(5);
/// assert!(pages < 10_000);
/// ```
pub fn pages() -> Result<u32> {
    env_or("BEATSYNC_PAGES", 5)
}

/// Per-request timeout (`BEATSYNC_HTTP_TIMEOUT_SECS`, default 30).
pub fn http_timeout() -> Result<Duration> {
    env_or("BEATSYNC_HTTP_TIMEOUT_SECS", 30).map(Duration::from_secs)
}

/// Interval between scheduled runs (`BEATSYNC_SCHEDULE_DAYS`, default 7).
pub fn schedule_days() -> Result<u64> {
    env_or("BEATSYNC_SCHEDULE_DAYS", 7)
}

/// Returns the base URLs of both BeatSaver hosts.
///
/// Combines [`beatsaver_url`] and [`beatsaver_apiurl`]; pointing both at a
/// local mock server is the usual way to try a sync without touching the
/// real playlist.
pub fn endpoints() -> Endpoints {
    Endpoints {
        web: beatsaver_url(),
        api: beatsaver_apiurl(),
    }
}

/// Returns the retry policy for playlist removals.
///
/// A removal answered with 5xx, 429 or no response at all is retried up to
/// `BEATSYNC_RETRIES` (default 3) more times. The wait before retry `n`
/// (0-based) is `BEATSYNC_RETRY_BASE_SLEEP_MS * 2^n` (default base 1500 ms),
/// so the defaults wait 1.5 s, 3 s and 6 s.
///
/// # Errors
///
/// Returns [`SyncError::Config`] if either variable is not an integer.
pub fn retry_policy() -> Result<RetryPolicy> {
    Ok(RetryPolicy {
        retries: env_or("BEATSYNC_RETRIES", 3)?,
        base_sleep: Duration::from_millis(env_or("BEATSYNC_RETRY_BASE_SLEEP_MS", 1500)?),
    })
}

/// Returns the pauses used to stay gentle on the BeatSaver API.
///
/// # Environment Variables Used
///
/// - `BEATSYNC_BATCH_SIZE` - removals between two pauses while emptying (default 1)
/// - `BEATSYNC_BATCH_SLEEP_MS` - pause between removal batches (default 5)
/// - `BEATSYNC_SLEEP_MS_BETWEEN_POSTS` - pause after every add (default 20)
/// - `BEATSYNC_SLEEP_MS_BETWEEN_PAGES` - pause after every search page (default 100)
///
/// # Errors
///
/// Returns [`SyncError::Config`] for a non-integer value or a batch size of 0.
pub fn pacing() -> Result<Pacing> {
    let batch_size: usize = env_or("BEATSYNC_BATCH_SIZE", 1)?;
    if batch_size == 0 {
        return Err(SyncError::Config(
            "BEATSYNC_BATCH_SIZE must be at least 1".to_string(),
        ));
    }

    Ok(Pacing {
        batch_size,
        batch_sleep: Duration::from_millis(env_or("BEATSYNC_BATCH_SLEEP_MS", 5)?),
        post_sleep: Duration::from_millis(env_or("BEATSYNC_SLEEP_MS_BETWEEN_POSTS", 20)?),
        page_sleep: Duration::from_millis(env_or("BEATSYNC_SLEEP_MS_BETWEEN_PAGES", 100)?),
    })
}

/// Search parameters from `BEATSYNC_QUERY`, `BEATSYNC_LEADERBOARD` and
/// `BEATSYNC_SORT_ORDER`. The extra query-string suffix is always empty here;
/// it comes from the command line or a job entry.
pub fn search_filter() -> SearchFilter {
    SearchFilter {
        query: env_or_string("BEATSYNC_QUERY", ""),
        leaderboard: env_or_string("BEATSYNC_LEADERBOARD", "All"),
        sort_order: env_or_string("BEATSYNC_SORT_ORDER", "Rating"),
        extra_args: String::new(),
    }
}

fn env_or_string(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| SyncError::Config(format!("{} has an invalid value '{}'", key, raw))),
        _ => Ok(default),
    }
}
