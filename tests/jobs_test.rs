use std::time::Duration;

use beatsync::{
    SyncError,
    cli::{MAX_SCHEDULE_DAYS, load_jobs, schedule_period},
    types::SyncJob,
};

#[tokio::test]
async fn test_load_jobs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jobs.json");
    std::fs::write(
        &path,
        r#"[
            {"playlist": "986760", "pages": 5, "args": "&vivify=true"},
            {"playlist": "https://beatsaver.com/playlists/658586", "pages": 20}
        ]"#,
    )
    .unwrap();

    let jobs = load_jobs(&path).await.unwrap();

    assert_eq!(
        jobs,
        vec![
            SyncJob {
                playlist: "986760".to_string(),
                pages: 5,
                args: "&vivify=true".to_string(),
            },
            SyncJob {
                playlist: "https://beatsaver.com/playlists/658586".to_string(),
                pages: 20,
                args: String::new(),
            },
        ]
    );
}

#[tokio::test]
async fn test_missing_jobs_file_means_no_jobs() {
    let dir = tempfile::tempdir().unwrap();

    let jobs = load_jobs(&dir.path().join("jobs.json")).await.unwrap();

    assert!(jobs.is_empty());
}

#[test]
fn test_schedule_period() {
    assert_eq!(
        schedule_period(7).unwrap(),
        Duration::from_secs(7 * 24 * 60 * 60)
    );
    assert!(schedule_period(MAX_SCHEDULE_DAYS).is_ok());
    assert!(matches!(schedule_period(0), Err(SyncError::Config(_))));
    assert!(matches!(
        schedule_period(MAX_SCHEDULE_DAYS + 1),
        Err(SyncError::Config(_))
    ));
    assert!(matches!(schedule_period(u64::MAX), Err(SyncError::Config(_))));
    assert!(matches!(
        schedule_period(u64::MAX / 86_400 + 1),
        Err(SyncError::Config(_))
    ));
}
