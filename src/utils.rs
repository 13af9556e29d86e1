use std::{sync::OnceLock, time::Duration};

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;

use crate::types::{AddOutcome, FailedItem, FailureTableRow, PlaylistId};

/// Number of failures rendered in detail at the end of a run.
pub const FAILURE_DETAIL_LIMIT: usize = 20;

fn playlist_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)beatsaver\.com/playlists/([0-9]+)")
            .expect("playlist URL pattern is valid")
    })
}

/// Resolves a playlist identifier from a bare number or a playlist URL such as
/// `https://www.beatsaver.com/playlists/658586`.
pub fn parse_playlist_id(input: &str) -> Option<PlaylistId> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if s.chars().all(|c| c.is_ascii_digit()) {
        return Some(PlaylistId::new(s.to_string()));
    }

    playlist_url_pattern()
        .captures(s)
        .and_then(|caps| caps.get(1))
        .map(|m| PlaylistId::new(m.as_str().to_string()))
}

/// Classifies the response of an add request: any 2xx is added, 409 and 400
/// (already present or invalid map) are skipped, everything else failed.
pub fn classify_add(status: Option<u16>, body: &str) -> AddOutcome {
    match status {
        Some(code) if (200..300).contains(&code) => AddOutcome::Added,
        Some(code @ (400 | 409)) => AddOutcome::Skipped {
            reason: format!("status {}", code),
        },
        _ => AddOutcome::Failed {
            status,
            body: body.to_string(),
        },
    }
}

/// Whether the drain phase pauses after the item at `index` (0-based).
/// Never pauses after the final item.
pub fn should_pause_after(index: usize, total: usize, batch_size: usize) -> bool {
    let done = index + 1;
    batch_size > 0 && done % batch_size == 0 && done < total
}

/// Delay before retry number `attempt + 1`: `base * 2^attempt`.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
}

/// Whether a toggle response code is worth retrying.
pub fn is_transient(status: u16) -> bool {
    status >= 500 || status == 429
}

/// Parses an HTTP cookie date such as `Mon, 25 Aug 2025 18:46:59 GMT` or the
/// legacy `Mon, 25-Aug-2025 18:46:59 GMT` form.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(date) = DateTime::parse_from_rfc2822(value) {
        return Some(date.with_timezone(&Utc));
    }

    ["%a, %d-%b-%Y %H:%M:%S GMT", "%a, %d-%b-%y %H:%M:%S GMT"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

pub fn failure_rows(failed: &[FailedItem]) -> Vec<FailureTableRow> {
    failed
        .iter()
        .take(FAILURE_DETAIL_LIMIT)
        .map(|f| FailureTableRow {
            map: f.map_id.clone(),
            status: f
                .status
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
            body: truncate(&f.body, 120),
        })
        .collect()
}

fn truncate(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(max_chars).collect();
    out.push('…');
    out
}
