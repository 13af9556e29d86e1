//! # BeatSaver Integration Module
//!
//! HTTP plumbing and the BeatSaver endpoints used by a sync run.
//!
//! ```text
//! Sync workflow (drain, fill)
//!          ↓
//! BeatSaver endpoints
//!     ├── auth      (login, cookie parsing, expiry refresh)
//!     ├── playlist  (metadata, manifest, toggle with retry, add)
//!     └── search    (paginated catalog search)
//!          ↓
//! Transport (reqwest) + Clock (tokio sleeps)
//! ```
//!
//! Two hosts are involved: the web host (`beatsaver.com`) serves login and the
//! playlist toggle endpoint, the API host (`api.beatsaver.com`) serves search and
//! playlist metadata.
//!
//! Every endpoint goes through a [`BeatSaver`] value that owns a [`Transport`] and
//! a [`Clock`]. Production uses [`ReqwestTransport`] and [`SystemClock`]; tests swap
//! in scripted fakes to observe retries and pacing.

pub mod auth;
pub mod playlist;
pub mod search;

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, Response, header::COOKIE, redirect::Policy};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::{Result, SyncError};

/// Status, headers and body of a completed HTTP exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// All values of a header, matched case-insensitively.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The HTTP calls a sync run needs.
///
/// Implementations return `Err` only when no response was received at all
/// (connection failure, timeout); every status code is an `Ok` response.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// GET following redirects.
    async fn get(&self, url: &str) -> Result<HttpResponse>;

    /// POST a JSON body with a `Cookie` header, following redirects.
    async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        cookie: &str,
    ) -> Result<HttpResponse>;

    /// POST a form without following redirects.
    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<HttpResponse>;
}

pub struct ReqwestTransport {
    client: Client,
    no_redirect: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let user_agent = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| SyncError::Transport(e.to_string()))?;
        let no_redirect = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(Policy::none())
            .build()
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            no_redirect,
        })
    }

    async fn read(response: Response) -> Result<HttpResponse> {
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;
        Self::read(response).await
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        cookie: &str,
    ) -> Result<HttpResponse> {
        let response = self
            .client
            .post(url)
            .header(COOKIE, cookie)
            .json(body)
            .send()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;
        Self::read(response).await
    }

    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<HttpResponse> {
        let response = self
            .no_redirect
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;
        Self::read(response).await
    }
}

/// Source of the current time and of pacing sleeps.
#[allow(async_fn_in_trait)]
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Base URLs of the two BeatSaver hosts, without trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub web: String,
    pub api: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts allowed after the first one.
    pub retries: u32,
    pub base_sleep: Duration,
}

pub struct BeatSaver<T, C> {
    transport: T,
    clock: C,
    endpoints: Endpoints,
    retry: RetryPolicy,
}

impl<T: Transport, C: Clock> BeatSaver<T, C> {
    pub fn new(transport: T, clock: C, endpoints: Endpoints, retry: RetryPolicy) -> Self {
        let endpoints = Endpoints {
            web: endpoints.web.trim_end_matches('/').to_string(),
            api: endpoints.api.trim_end_matches('/').to_string(),
        };
        Self {
            transport,
            clock,
            endpoints,
            retry,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// One-shot GET of a JSON document; any non-2xx status is fatal.
    pub(crate) async fn fetch_json<D: DeserializeOwned>(&self, url: &str) -> Result<D> {
        let response = self.transport.get(url).await?;
        if !response.is_success() {
            return Err(SyncError::Fetch {
                url: url.to_string(),
                status: response.status,
                body: response.body,
            });
        }

        serde_json::from_str(&response.body).map_err(|e| SyncError::Decode {
            url: url.to_string(),
            source: e,
        })
    }
}
