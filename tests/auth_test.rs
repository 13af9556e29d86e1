mod common;

use beatsync::{
    SyncError,
    beatsaver::{HttpResponse, auth::parse_cookie},
    management::{PROPERTY_COOKIE, PropertyStore, SessionManager},
};
use chrono::{TimeZone, Utc};
use common::*;

const FRESH_COOKIE: &str =
    "BMSESSIONID=fresh; Max-Age=2592000; Expires=Wed, 01 Oct 2025 12:00:00 GMT; Path=/; HttpOnly";

async fn session_with_cookie(dir: &std::path::Path, raw: &str) -> SessionManager {
    let mut session = session_in(dir).await;
    session.save_cookie(&parse_cookie(raw)).await.unwrap();
    session
}

#[tokio::test]
async fn test_login_posts_credentials_and_returns_session_cookie() {
    let dir = tempfile::tempdir().unwrap();
    let session = session_in(dir.path()).await;
    let transport = FakeTransport::new().on(
        "POST",
        &login_url(),
        HttpResponse::new(302, "")
            .with_header("set-cookie", "OTHER=1; Path=/")
            .with_header("Set-Cookie", FRESH_COOKIE),
    );
    let client = client(transport, FakeClock::default());

    let raw = client.login(&session).await.unwrap();

    assert_eq!(raw, FRESH_COOKIE);
    let requests = client.transport().requests_to("POST", &login_url());
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].form,
        vec![
            ("username".to_string(), "mapper".to_string()),
            ("password".to_string(), "hunter2".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_login_without_set_cookie_fails() {
    let dir = tempfile::tempdir().unwrap();
    let session = session_in(dir.path()).await;
    let transport = FakeTransport::new().on("POST", &login_url(), HttpResponse::new(200, "login"));
    let client = client(transport, FakeClock::default());

    let err = client.login(&session).await.unwrap_err();

    assert!(matches!(err, SyncError::Auth(_)));
}

#[tokio::test]
async fn test_login_without_session_cookie_fails() {
    let dir = tempfile::tempdir().unwrap();
    let session = session_in(dir.path()).await;
    let transport = FakeTransport::new().on("POST", &login_url(), login_response("OTHER=1; Path=/"));
    let client = client(transport, FakeClock::default());

    let err = client.login(&session).await.unwrap_err();

    assert!(matches!(err, SyncError::Auth(msg) if msg.contains("BMSESSIONID")));
}

#[tokio::test]
async fn test_login_requires_credentials() {
    let dir = tempfile::tempdir().unwrap();
    let store = PropertyStore::open(dir.path().join("properties.json"))
        .await
        .unwrap();
    let session = SessionManager::new(store);
    let client = client(FakeTransport::new(), FakeClock::default());

    let err = client.login(&session).await.unwrap_err();

    assert!(matches!(err, SyncError::Auth(_)));
    assert!(client.transport().requests().is_empty());
}

#[tokio::test]
async fn test_expired_cookie_triggers_exactly_one_login() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_with_cookie(
        dir.path(),
        "BMSESSIONID=stale; Expires=Mon, 25 Aug 2025 18:46:59 GMT; HttpOnly",
    )
    .await;
    let transport = FakeTransport::new().on("POST", &login_url(), login_response(FRESH_COOKIE));
    let now = Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap();
    let client = client(transport, FakeClock::at(now));

    let cookie = client.load_valid_cookie(&mut session).await.unwrap();

    assert_eq!(cookie.session_id(), Some("fresh"));
    assert_eq!(client.transport().requests_to("POST", &login_url()).len(), 1);
    // the refreshed cookie replaced the stored one
    assert_eq!(session.load_cookie().unwrap(), parse_cookie(FRESH_COOKIE));
}

#[tokio::test]
async fn test_future_cookie_is_kept() {
    let dir = tempfile::tempdir().unwrap();
    let raw = "BMSESSIONID=valid; Expires=Mon, 25 Aug 2025 18:46:59 GMT";
    let mut session = session_with_cookie(dir.path(), raw).await;
    let now = Utc.with_ymd_and_hms(2025, 8, 25, 18, 46, 0).unwrap();
    let client = client(FakeTransport::new(), FakeClock::at(now));

    let cookie = client.load_valid_cookie(&mut session).await.unwrap();

    assert_eq!(cookie, parse_cookie(raw));
    assert!(client.transport().requests().is_empty());
}

#[tokio::test]
async fn test_unparsable_expiry_keeps_cookie() {
    let dir = tempfile::tempdir().unwrap();
    let raw = "BMSESSIONID=valid; Expires=sometime soon";
    let mut session = session_with_cookie(dir.path(), raw).await;
    let client = client(FakeTransport::new(), FakeClock::default());

    let cookie = client.load_valid_cookie(&mut session).await.unwrap();

    assert_eq!(cookie, parse_cookie(raw));
    assert!(client.transport().requests().is_empty());
}

#[tokio::test]
async fn test_cookie_without_expiry_is_kept() {
    let dir = tempfile::tempdir().unwrap();
    let raw = "BMSESSIONID=valid; Path=/";
    let mut session = session_with_cookie(dir.path(), raw).await;
    let client = client(FakeTransport::new(), FakeClock::default());

    let cookie = client.load_valid_cookie(&mut session).await.unwrap();

    assert_eq!(cookie.session_id(), Some("valid"));
    assert!(client.transport().requests().is_empty());
}

#[tokio::test]
async fn test_lowercase_expires_is_honoured() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_with_cookie(
        dir.path(),
        "BMSESSIONID=stale; expires=Mon, 25 Aug 2025 18:46:59 GMT",
    )
    .await;
    let transport = FakeTransport::new().on("POST", &login_url(), login_response(FRESH_COOKIE));
    let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let client = client(transport, FakeClock::at(now));

    let cookie = client.load_valid_cookie(&mut session).await.unwrap();

    assert_eq!(cookie.session_id(), Some("fresh"));
}

#[tokio::test]
async fn test_missing_cookie_is_an_auth_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(dir.path()).await;
    let client = client(FakeTransport::new(), FakeClock::default());

    let err = client.load_valid_cookie(&mut session).await.unwrap_err();

    assert!(matches!(err, SyncError::Auth(_)));
}

#[tokio::test]
async fn test_session_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        session_with_cookie(dir.path(), FRESH_COOKIE).await;
    }

    let store = PropertyStore::open(dir.path().join("properties.json"))
        .await
        .unwrap();
    assert!(store.get(PROPERTY_COOKIE).is_some());
    assert!(store.get("missing").is_none());

    let session = SessionManager::new(store);
    let credentials = session.credentials().unwrap();
    assert_eq!(credentials.username, "mapper");
    assert_eq!(credentials.password, "hunter2");
    assert_eq!(session.load_cookie().unwrap(), parse_cookie(FRESH_COOKIE));
}

#[tokio::test]
async fn test_corrupt_store_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("properties.json");
    std::fs::write(&path, "not json").unwrap();

    let result = PropertyStore::open(path).await;

    assert!(matches!(result, Err(SyncError::StoreFormat(_))));
}
