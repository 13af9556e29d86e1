#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    path::Path,
    sync::Mutex,
    time::Duration,
};

use beatsync::{
    SyncError,
    beatsaver::{BeatSaver, Clock, Endpoints, HttpResponse, RetryPolicy, Transport},
    management::{PropertyStore, SessionManager},
    types::Credentials,
};
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use serde_json::Value;

pub const WEB: &str = "https://beatsaver.test";
pub const API: &str = "https://api.beatsaver.test";

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub json: Option<Value>,
    pub cookie: Option<String>,
    pub form: Vec<(String, String)>,
}

type Reply = Result<HttpResponse, String>;

/// Scripted transport. Each `(method, url)` route answers from its queue; the
/// last reply of a queue repeats forever. Unknown routes answer 404.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<(&'static str, String), VecDeque<Reply>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, method: &'static str, url: &str, response: HttpResponse) -> Self {
        self.push(method, url, Ok(response));
        self
    }

    pub fn on_error(self, method: &'static str, url: &str, message: &str) -> Self {
        self.push(method, url, Err(message.to_string()));
        self
    }

    fn push(&self, method: &'static str, url: &str, reply: Reply) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, url.to_string()))
            .or_default()
            .push_back(reply);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: &str, url: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.url == url)
            .collect()
    }

    fn reply(&self, request: RecordedRequest) -> beatsync::Result<HttpResponse> {
        let key = (request.method, request.url.clone());
        self.requests.lock().unwrap().push(request);

        let mut routes = self.routes.lock().unwrap();
        let reply = match routes.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        match reply {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(SyncError::Transport(message)),
            None => Ok(HttpResponse::new(404, "not found")),
        }
    }
}

impl Transport for FakeTransport {
    async fn get(&self, url: &str) -> beatsync::Result<HttpResponse> {
        self.reply(RecordedRequest {
            method: "GET",
            url: url.to_string(),
            json: None,
            cookie: None,
            form: Vec::new(),
        })
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        cookie: &str,
    ) -> beatsync::Result<HttpResponse> {
        self.reply(RecordedRequest {
            method: "POST",
            url: url.to_string(),
            json: Some(serde_json::to_value(body).unwrap()),
            cookie: Some(cookie.to_string()),
            form: Vec::new(),
        })
    }

    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> beatsync::Result<HttpResponse> {
        self.reply(RecordedRequest {
            method: "POST",
            url: url.to_string(),
            json: None,
            cookie: None,
            form: form
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        })
    }
}

/// Clock frozen at a fixed instant that records sleeps instead of waiting.
pub struct FakeClock {
    now: DateTime<Utc>,
    sleeps: Mutex<Vec<Duration>>,
}

impl FakeClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now,
            sleeps: Mutex::new(Vec::new()),
        }
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::at(Utc.with_ymd_and_hms(2025, 8, 1, 12, 0, 0).unwrap())
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

pub fn retry_policy() -> RetryPolicy {
    RetryPolicy {
        retries: 3,
        base_sleep: Duration::from_millis(1500),
    }
}

pub fn client(transport: FakeTransport, clock: FakeClock) -> BeatSaver<FakeTransport, FakeClock> {
    BeatSaver::new(
        transport,
        clock,
        Endpoints {
            web: WEB.to_string(),
            api: API.to_string(),
        },
        retry_policy(),
    )
}

pub fn toggle_url(playlist: &str) -> String {
    format!("{}/api/playlists/id/{}/add", WEB, playlist)
}

pub fn login_url() -> String {
    format!("{}/login", WEB)
}

pub fn login_response(set_cookie: &str) -> HttpResponse {
    HttpResponse::new(302, "").with_header("Set-Cookie", set_cookie)
}

/// A session with stored credentials in `dir`.
pub async fn session_in(dir: &Path) -> SessionManager {
    let store = PropertyStore::open(dir.join("properties.json"))
        .await
        .unwrap();
    let mut session = SessionManager::new(store);
    session
        .save_credentials(&Credentials {
            username: "mapper".to_string(),
            password: "hunter2".to_string(),
        })
        .await
        .unwrap();
    session
}
