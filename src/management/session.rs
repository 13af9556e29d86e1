use crate::{
    error::{Result, SyncError},
    management::PropertyStore,
    types::{Credentials, SessionCookie},
};

pub const PROPERTY_USERNAME: &str = "username";
pub const PROPERTY_PASSWORD: &str = "password";
pub const PROPERTY_COOKIE: &str = "cookie";

/// Credentials and session cookie of one BeatSaver account.
///
/// Built once at startup and handed to every operation that authenticates.
/// All state lives in the wrapped [`PropertyStore`] under three keys:
///
/// - `username` / `password` - written by `beatsync init`, read on every login
/// - `cookie` - the parsed `Set-Cookie` attributes as a JSON object, replaced
///   wholesale after each login
///
/// # Example
///
/// ```no_run
/// use beatsync::{
///     config,
///     management::{PropertyStore, SessionManager},
/// };
///
/// # async fn demo() -> beatsync::error::Result<()> {
/// let store = PropertyStore::open(config::properties_path()).await?;
/// let session = SessionManager::new(store);
/// let cookie = session.load_cookie()?;
/// # let _ = cookie;
/// # Ok(())
/// # }
/// ```
pub struct SessionManager {
    store: PropertyStore,
}

impl SessionManager {
    pub fn new(store: PropertyStore) -> Self {
        SessionManager { store }
    }

    pub fn store(&self) -> &PropertyStore {
        &self.store
    }

    /// Stores the username and password, overwriting earlier ones.
    ///
    /// # Arguments
    ///
    /// * `credentials` - The account to log in with from now on
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Store`] if the property file cannot be written.
    pub async fn save_credentials(&mut self, credentials: &Credentials) -> Result<()> {
        self.store
            .set(PROPERTY_USERNAME, credentials.username.clone())
            .await?;
        self.store
            .set(PROPERTY_PASSWORD, credentials.password.clone())
            .await
    }

    /// Returns the stored credentials.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Auth`] when either value is missing; there is no
    /// fallback, the user has to run `beatsync init`.
    pub fn credentials(&self) -> Result<Credentials> {
        match (
            self.store.get(PROPERTY_USERNAME),
            self.store.get(PROPERTY_PASSWORD),
        ) {
            (Some(username), Some(password)) => Ok(Credentials {
                username: username.to_string(),
                password: password.to_string(),
            }),
            _ => Err(SyncError::Auth(
                "no saved credentials found. Run `beatsync init` first".to_string(),
            )),
        }
    }

    /// Persists `cookie` as the current session, replacing any previous one.
    pub async fn save_cookie(&mut self, cookie: &SessionCookie) -> Result<()> {
        let json = serde_json::to_string(cookie)?;
        self.store.set(PROPERTY_COOKIE, json).await
    }

    /// Returns the stored session cookie without checking its expiry.
    ///
    /// Use `BeatSaver::load_valid_cookie` to get a cookie that is refreshed
    /// when expired.
    ///
    /// # Errors
    ///
    /// - [`SyncError::Auth`] if no cookie was ever saved
    /// - [`SyncError::StoreFormat`] if the stored value is not a JSON object
    pub fn load_cookie(&self) -> Result<SessionCookie> {
        let raw = self.store.get(PROPERTY_COOKIE).ok_or_else(|| {
            SyncError::Auth("no saved cookie found. Run `beatsync init` first".to_string())
        })?;

        Ok(serde_json::from_str(raw)?)
    }
}
