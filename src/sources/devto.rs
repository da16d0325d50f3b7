//! DEV Community (dev.to) source.
//!
//! Queries the public articles API once per configured tag, in a shuffled
//! order so consecutive runs do not always start with the same tag. Results
//! from all tags are concatenated in query order and deduplicated by id.
//! A failing tag is logged and skipped; the source only fails when every tag
//! fails.

use super::FetchArticles;
use crate::api::get_text_with_backoff;
use crate::error::SourceError;
use crate::models::CandidateArticle;
use itertools::Itertools;
use rand::rng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

const API_BASE: &str = "https://dev.to/api/articles";

#[derive(Debug, Deserialize)]
struct DevtoArticle {
    id: u64,
    title: String,
    #[serde(default)]
    description: Option<String>,
    url: String,
    #[serde(default)]
    readable_publish_date: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    tag_list: TagList,
    #[serde(default)]
    user: Option<DevtoUser>,
}

/// The listing endpoint returns tags as an array, the detail endpoint as a
/// comma-separated string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TagList {
    List(Vec<String>),
    Joined(String),
}

impl Default for TagList {
    fn default() -> Self {
        TagList::List(Vec::new())
    }
}

impl TagList {
    fn into_vec(self) -> Vec<String> {
        match self {
            TagList::List(v) => v,
            TagList::Joined(s) => s
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DevtoUser {
    #[serde(default)]
    name: Option<String>,
}

impl From<DevtoArticle> for CandidateArticle {
    fn from(a: DevtoArticle) -> Self {
        CandidateArticle {
            title: a.title.trim().to_string(),
            body_text: a.description.unwrap_or_default().trim().to_string(),
            source_label: format!(
                "DEV Community ({})",
                a.user.and_then(|u| u.name).as_deref().unwrap_or("unknown")
            ),
            url: a.url,
            external_id: format!("devto-{}", a.id),
            published_at: a
                .readable_publish_date
                .or(a.published_at)
                .unwrap_or_default(),
            topics: a.tag_list.into_vec(),
        }
    }
}

#[derive(Debug)]
pub struct DevtoSource {
    client: reqwest::Client,
    tags: Vec<String>,
    per_page: usize,
    top_days: u32,
}

impl DevtoSource {
    /// Create a dev.to source.
    ///
    /// # Arguments
    ///
    /// * `client` - Shared HTTP client.
    /// * `tags` - Tags to query, one request per tag in random order.
    /// * `per_page` - Listing page size per tag.
    /// * `top_days` - Window for the `top` ranking, in days.
    pub fn new(client: reqwest::Client, tags: Vec<String>, per_page: usize, top_days: u32) -> Self {
        Self {
            client,
            tags,
            per_page,
            top_days,
        }
    }

    fn tag_url(&self, tag: &str) -> String {
        format!(
            "{API_BASE}?tag={}&top={}&per_page={}",
            urlencoding::encode(tag),
            self.top_days,
            self.per_page
        )
    }
}

/// Decode one listing page.
fn parse_listing(json: &str) -> Result<Vec<CandidateArticle>, SourceError> {
    let articles: Vec<DevtoArticle> = serde_json::from_str(json)?;
    Ok(articles.into_iter().map(CandidateArticle::from).collect())
}

impl FetchArticles for DevtoSource {
    fn name(&self) -> &str {
        "devto"
    }

    /// Query every tag and merge the pages, dropping repeated ids.
    ///
    /// # Errors
    ///
    /// Fails only when no tag produced any article and at least one request
    /// failed; that error is the last one seen.
    #[instrument(level = "info", skip_all, fields(source = "devto"))]
    async fn try_fetch(&self) -> Result<Vec<CandidateArticle>, SourceError> {
        let mut tags: Vec<&String> = self.tags.iter().filter(|t| !t.trim().is_empty()).collect();
        tags.shuffle(&mut rng());

        let mut collected: Vec<CandidateArticle> = Vec::new();
        let mut last_error = None;
        for tag in tags {
            let url = self.tag_url(tag);
            let page = get_text_with_backoff(&self.client, &url)
                .await
                .and_then(|body| parse_listing(&body));
            match page {
                Ok(items) => {
                    debug!(%tag, count = items.len(), "dev.to tag page");
                    collected.extend(items);
                }
                Err(e) => {
                    warn!(%tag, error = %e, "dev.to tag query failed");
                    last_error = Some(e);
                }
            }
        }

        if collected.is_empty() {
            if let Some(e) = last_error {
                return Err(e);
            }
        }

        Ok(collected
            .into_iter()
            .unique_by(|c| c.external_id.clone())
            .collect())
    }
}
