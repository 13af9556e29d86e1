use crate::{
    cli::{build_client, open_session},
    config, error, info, success,
    types::Credentials,
};

/// Stores the account credentials and logs in once to obtain a session cookie.
pub async fn init(username: String, password: String) {
    let mut session = match open_session().await {
        Ok(session) => session,
        Err(e) => error!("Failed to open property store: {}", e),
    };

    let credentials = Credentials { username, password };
    if let Err(e) = session.save_credentials(&credentials).await {
        error!("Failed to save credentials: {}", e);
    }

    let client = match build_client() {
        Ok(client) => client,
        Err(e) => error!("{}", e),
    };

    match client.refresh_cookie(&mut session).await {
        Ok(cookie) => {
            success!("Logged in as {}.", credentials.username);
            if let Some(expires) = cookie.expires() {
                info!("Session cookie expires {}", expires);
            }
        }
        Err(e) => error!("Login failed: {}", e),
    }

    info!(
        "List playlists to sync in {} and start `beatsync schedule` to sync them every {} days.",
        config::jobs_path().display(),
        config::schedule_days().unwrap_or(7)
    );
}

/// Logs in again with the stored credentials, replacing the saved cookie.
pub async fn login() {
    let mut session = match open_session().await {
        Ok(session) => session,
        Err(e) => error!("Failed to open property store: {}", e),
    };

    let client = match build_client() {
        Ok(client) => client,
        Err(e) => error!("{}", e),
    };

    match client.refresh_cookie(&mut session).await {
        Ok(_) => success!("Session cookie refreshed."),
        Err(e) => error!("Login failed: {}", e),
    }
}
