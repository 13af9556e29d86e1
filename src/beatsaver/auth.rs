use std::collections::BTreeMap;

use crate::{
    beatsaver::{BeatSaver, Clock, Transport},
    error::{Result, SyncError},
    info,
    management::SessionManager,
    types::{CookieValue, SESSION_COOKIE_NAME, SessionCookie},
    utils, warning,
};

impl<T: Transport, C: Clock> BeatSaver<T, C> {
    /// Logs in with the stored credentials and returns the raw `Set-Cookie`
    /// value carrying the session id.
    ///
    /// Redirects are not followed: the session cookie arrives on the 302.
    pub async fn login(&self, session: &SessionManager) -> Result<String> {
        let credentials = session.credentials()?;
        let url = format!("{}/login", self.endpoints.web);

        let response = self
            .transport
            .post_form(
                &url,
                &[
                    ("username", credentials.username.as_str()),
                    ("password", credentials.password.as_str()),
                ],
            )
            .await?;

        let cookies: Vec<&str> = response.header_values("set-cookie").collect();
        if cookies.is_empty() {
            return Err(SyncError::Auth(format!(
                "no Set-Cookie header returned from login (status {}); check credentials",
                response.status
            )));
        }

        let marker = format!("{}=", SESSION_COOKIE_NAME);
        cookies
            .into_iter()
            .find(|c| c.contains(&marker))
            .map(str::to_string)
            .ok_or_else(|| {
                SyncError::Auth(format!("Set-Cookie did not include {}", SESSION_COOKIE_NAME))
            })
    }

    /// Logs in and persists the resulting cookie.
    pub async fn refresh_cookie(&self, session: &mut SessionManager) -> Result<SessionCookie> {
        let raw = self.login(session).await?;
        let cookie = parse_cookie(&raw);
        session.save_cookie(&cookie).await?;
        session.load_cookie()
    }

    /// Returns the stored session cookie, logging in again first if its
    /// `Expires` date has passed.
    ///
    /// A missing or unparsable `Expires` keeps the stored cookie.
    pub async fn load_valid_cookie(&self, session: &mut SessionManager) -> Result<SessionCookie> {
        let cookie = session.load_cookie()?;

        let Some(expires) = cookie.expires() else {
            return Ok(cookie);
        };

        match utils::parse_http_date(expires) {
            None => {
                warning!("Could not parse cookie Expires value: {}", expires);
                Ok(cookie)
            }
            Some(expiry) if self.clock.now() > expiry => {
                info!("Cookie expired, regenerating...");
                self.refresh_cookie(session).await
            }
            Some(_) => Ok(cookie),
        }
    }
}

/// Parses one `Set-Cookie` value into its attributes.
///
/// `Expires` keeps its exact value, commas and spaces included. Attributes
/// without `=` (`HttpOnly`, `Secure`) become flags.
pub fn parse_cookie(raw: &str) -> SessionCookie {
    let mut attributes = BTreeMap::new();

    for part in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        match part.split_once('=') {
            Some((name, value)) => {
                attributes.insert(
                    name.trim().to_string(),
                    CookieValue::Text(value.trim().to_string()),
                );
            }
            None => {
                attributes.insert(part.to_string(), CookieValue::Flag(true));
            }
        }
    }

    SessionCookie::new(attributes)
}

/// The `Cookie` request header presenting the session id.
pub fn cookie_header(cookie: &SessionCookie) -> Result<String> {
    cookie
        .session_id()
        .map(|id| format!("{}={}", SESSION_COOKIE_NAME, id))
        .ok_or_else(|| {
            SyncError::Auth(format!(
                "saved cookie has no {}. Run `beatsync login`",
                SESSION_COOKIE_NAME
            ))
        })
}
