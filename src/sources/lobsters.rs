//! Lobsters source (`hottest.json`).

use super::{FetchArticles, html_to_text};
use crate::api::get_text_with_backoff;
use crate::error::SourceError;
use crate::models::CandidateArticle;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

#[derive(Debug, Deserialize)]
struct LobstersStory {
    short_id: String,
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    comments_url: String,
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    description_plain: Option<String>,
    /// A bare username in current payloads, an object in older ones.
    #[serde(default)]
    submitter_user: Value,
    #[serde(default)]
    tags: Vec<String>,
}

fn submitter_name(v: &Value) -> &str {
    match v {
        Value::String(s) => s.as_str(),
        Value::Object(map) => map.get("username").and_then(Value::as_str).unwrap_or("unknown"),
        _ => "unknown",
    }
}

impl From<LobstersStory> for CandidateArticle {
    fn from(s: LobstersStory) -> Self {
        let body_text = match s.description_plain {
            Some(plain) if !plain.trim().is_empty() => {
                plain.split_whitespace().collect::<Vec<_>>().join(" ")
            }
            _ => html_to_text(&s.description),
        };
        let url = if s.url.is_empty() { s.comments_url } else { s.url };
        CandidateArticle {
            title: s.title.trim().to_string(),
            body_text,
            source_label: format!("Lobsters ({})", submitter_name(&s.submitter_user)),
            url,
            external_id: format!("lob-{}", s.short_id),
            published_at: s.created_at,
            topics: s.tags,
        }
    }
}

fn parse_hottest(json: &str) -> Result<Vec<CandidateArticle>, SourceError> {
    let stories: Vec<LobstersStory> = serde_json::from_str(json)?;
    Ok(stories.into_iter().map(CandidateArticle::from).collect())
}

#[derive(Debug)]
pub struct LobstersSource {
    client: reqwest::Client,
    url: String,
}

impl LobstersSource {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

impl FetchArticles for LobstersSource {
    fn name(&self) -> &str {
        "lobsters"
    }

    #[instrument(level = "info", skip_all, fields(source = "lobsters", url = %self.url))]
    async fn try_fetch(&self) -> Result<Vec<CandidateArticle>, SourceError> {
        let body = get_text_with_backoff(&self.client, &self.url).await?;
        parse_hottest(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOTTEST: &str = r#"[
      {
        "short_id": "abc123",
        "short_id_url": "https://lobste.rs/s/abc123",
        "created_at": "2025-10-17T08:12:44.000-05:00",
        "title": "Writing a JavaScript engine in Rust",
        "url": "https://example.com/js-engine",
        "score": 42,
        "description": "",
        "description_plain": "",
        "comments_url": "https://lobste.rs/s/abc123/writing_javascript_engine_rust",
        "submitter_user": "alice",
        "tags": ["javascript", "rust", "compilers"]
      },
      {
        "short_id": "zz9",
        "created_at": "2025-10-16T11:00:00.000-05:00",
        "title": "Ask: favourite CSS resets?",
        "url": "",
        "description": "<p>Looking for <em>modern</em> resets</p>",
        "comments_url": "https://lobste.rs/s/zz9/ask_favourite_css_resets",
        "submitter_user": { "username": "bob" },
        "tags": ["css", "ask"]
      }
    ]"#;

    #[test]
    fn test_parse_hottest() {
        let items = parse_hottest(HOTTEST).unwrap();
        assert_eq!(items.len(), 2);

        assert_eq!(items[0].external_id, "lob-abc123");
        assert_eq!(items[0].source_label, "Lobsters (alice)");
        assert_eq!(items[0].url, "https://example.com/js-engine");
        assert_eq!(items[0].topics, vec!["javascript", "rust", "compilers"]);
        assert_eq!(items[0].body_text, "");

        assert_eq!(items[1].source_label, "Lobsters (bob)");
        assert_eq!(items[1].url, "https://lobste.rs/s/zz9/ask_favourite_css_resets");
        assert_eq!(items[1].body_text, "Looking for modern resets");
    }

    #[test]
    fn test_parse_hottest_rejects_non_array() {
        assert!(parse_hottest("<html>maintenance</html>").is_err());
    }
}
