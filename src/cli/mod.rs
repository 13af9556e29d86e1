//! # CLI Module
//!
//! User-facing commands of beatsync. Each command builds the HTTP client and
//! the session from configuration, runs its workflow and reports through the
//! crate's console macros. Fatal errors end the process via `error!`.
//!
//! ## Commands
//!
//! - [`init`] - Stores credentials and performs the first login
//! - [`login`] - Forces a fresh login and replaces the stored cookie
//! - [`sync`] - Empties a playlist and refills it from a catalog search
//! - [`drain`] - Only empties a playlist
//! - [`run`] - Syncs every job listed in `jobs.json`
//! - [`schedule`] - Repeats [`run`] on a fixed interval

mod init;
mod jobs;
mod sync;

pub use init::init;
pub use init::login;
pub use jobs::MAX_SCHEDULE_DAYS;
pub use jobs::load_jobs;
pub use jobs::run;
pub use jobs::schedule;
pub use jobs::schedule_period;
pub use sync::drain;
pub use sync::sync;
pub use sync::SyncOptions;

use crate::{
    beatsaver::{BeatSaver, ReqwestTransport, SystemClock},
    config,
    error::Result,
    management::{PropertyStore, SessionManager},
};

type LiveClient = BeatSaver<ReqwestTransport, SystemClock>;

fn build_client() -> Result<LiveClient> {
    let transport = ReqwestTransport::new(config::http_timeout()?)?;
    Ok(BeatSaver::new(
        transport,
        SystemClock,
        config::endpoints(),
        config::retry_policy()?,
    ))
}

async fn open_session() -> Result<SessionManager> {
    let store = PropertyStore::open(config::properties_path()).await?;
    Ok(SessionManager::new(store))
}
