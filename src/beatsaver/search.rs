use serde_json::Value;

use crate::{
    beatsaver::{BeatSaver, Clock, Transport},
    error::{Result, SyncError},
    types::{SearchDoc, SearchFilter, SearchResultItem},
};

/// Builds the text search URL for a zero-based `page`.
///
/// `extra_args` is appended verbatim, so it must already be a valid
/// query-string fragment such as `&vivify=true`.
pub fn build_search_url(api_url: &str, page: u32, filter: &SearchFilter) -> String {
    format!(
        "{uri}/search/text/{page}?q={q}&leaderboard={lb}&sortOrder={so}{args}",
        uri = api_url.trim_end_matches('/'),
        page = page,
        q = urlencoding::encode(&filter.query),
        lb = urlencoding::encode(&filter.leaderboard),
        so = urlencoding::encode(&filter.sort_order),
        args = filter.extra_args,
    )
}

impl<T: Transport, C: Clock> BeatSaver<T, C> {
    /// Fetches one page of search results.
    ///
    /// Anything but 200 is fatal. A body without a `docs` array yields no
    /// items; docs without an `id` are dropped.
    pub async fn fetch_page(&self, page: u32, filter: &SearchFilter) -> Result<Vec<SearchResultItem>> {
        let url = build_search_url(&self.endpoints.api, page, filter);
        let response = self.transport.get(&url).await?;
        if response.status != 200 {
            return Err(SyncError::Fetch {
                url,
                status: response.status,
                body: response.body,
            });
        }

        let body = if response.body.trim().is_empty() {
            "{}"
        } else {
            response.body.as_str()
        };
        let mut json: Value =
            serde_json::from_str(body).map_err(|e| SyncError::Decode { url, source: e })?;

        let docs = match json.get_mut("docs").map(Value::take) {
            Some(Value::Array(docs)) => docs,
            _ => Vec::new(),
        };

        Ok(docs
            .into_iter()
            .filter_map(|doc| serde_json::from_value::<SearchDoc>(doc).ok())
            .filter_map(|doc| doc.id)
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .map(|key| SearchResultItem { key })
            .collect())
    }
}
