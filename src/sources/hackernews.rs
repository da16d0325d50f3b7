//! Hacker News source (official Firebase API).
//!
//! Reads the top story ids, then fetches the first `limit` items
//! concurrently. Items keep the ranking order of the top stories list; all
//! item requests are joined before returning. Failed or deleted items are
//! dropped individually.

use super::{FetchArticles, html_to_text};
use crate::api::get_json_with_backoff;
use crate::error::SourceError;
use crate::models::CandidateArticle;
use chrono::DateTime;
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

const API_BASE: &str = "https://hacker-news.firebaseio.com/v0";
const ITEM_CONCURRENCY: usize = 8;

#[derive(Debug, Deserialize)]
struct HnItem {
    id: u64,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    by: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    time: Option<i64>,
    #[serde(default)]
    deleted: bool,
    #[serde(default)]
    dead: bool,
}

/// Convert an item into a candidate; non-stories and removed items yield `None`.
fn item_to_candidate(item: HnItem) -> Option<CandidateArticle> {
    if item.deleted || item.dead || item.kind.as_deref().is_some_and(|k| k != "story") {
        return None;
    }
    let title = item.title?.trim().to_string();
    if title.is_empty() {
        return None;
    }
    let discussion = format!("https://news.ycombinator.com/item?id={}", item.id);
    let published_at = item
        .time
        .and_then(|t| DateTime::from_timestamp(t, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_default();

    Some(CandidateArticle {
        title,
        body_text: item.text.as_deref().map(html_to_text).unwrap_or_default(),
        source_label: format!("Hacker News ({})", item.by.unwrap_or_else(|| "unknown".into())),
        url: item.url.filter(|u| !u.is_empty()).unwrap_or(discussion),
        external_id: format!("hn-{}", item.id),
        published_at,
        topics: Vec::new(),
    })
}

#[derive(Debug)]
pub struct HackerNewsSource {
    client: reqwest::Client,
    limit: usize,
}

impl HackerNewsSource {
    /// Create a Hacker News source reading the first `limit` top stories.
    pub fn new(client: reqwest::Client, limit: usize) -> Self {
        Self { client, limit }
    }

    async fn fetch_item(&self, id: u64) -> Option<CandidateArticle> {
        let url = format!("{API_BASE}/item/{id}.json");
        match get_json_with_backoff::<Option<HnItem>>(&self.client, &url).await {
            Ok(Some(item)) => item_to_candidate(item),
            Ok(None) => {
                debug!(id, "HN item missing");
                None
            }
            Err(e) => {
                warn!(id, error = %e, "HN item fetch failed");
                None
            }
        }
    }
}

impl FetchArticles for HackerNewsSource {
    fn name(&self) -> &str {
        "hackernews"
    }

    #[instrument(level = "info", skip_all, fields(source = "hackernews", limit = self.limit))]
    async fn try_fetch(&self) -> Result<Vec<CandidateArticle>, SourceError> {
        let ids: Vec<u64> =
            get_json_with_backoff(&self.client, &format!("{API_BASE}/topstories.json")).await?;
        let ids: Vec<u64> = ids.into_iter().take(self.limit).collect();
        info!(count = ids.len(), "Indexed HN top stories");

        let candidates: Vec<CandidateArticle> = stream::iter(ids)
            .map(|id| self.fetch_item(id))
            .buffered(ITEM_CONCURRENCY)
            .filter_map(std::future::ready)
            .collect()
            .await;

        Ok(candidates)
    }
}
