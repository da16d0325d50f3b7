//! Generic RSS 2.0 feed source.
//!
//! Item `<category>` elements become topics. The id suffix is the item's
//! `<guid>`, falling back to `<link>`; items with neither are dropped.
//! The byline prefers `<dc:creator>` over `<author>`.

use super::{FetchArticles, html_to_text};
use crate::api::get_text_with_backoff;
use crate::error::SourceError;
use crate::models::CandidateArticle;
use quick_xml::de::from_str;
use serde::Deserialize;
use tracing::{debug, instrument};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    guid: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
    author: Option<String>,
    #[serde(rename = "dc:creator")]
    dc_creator: Option<String>,
    #[serde(rename = "category", default)]
    categories: Vec<String>,
}

/// Feeds routinely carry HTML entities that are not valid XML.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&hellip;", "...")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}

fn parse_feed(xml: &str, feed_name: &str, prefix: &str) -> Result<Vec<CandidateArticle>, SourceError> {
    let rss: Rss = from_str(&scrub_html_entities_for_xml(xml))?;

    let mut out = Vec::with_capacity(rss.channel.items.len());
    for it in rss.channel.items {
        let title = it.title.as_deref().unwrap_or_default().trim().to_string();
        let Some(key) = it
            .guid
            .as_deref()
            .or(it.link.as_deref())
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
        else {
            debug!(%title, "RSS item without guid or link; skipping");
            continue;
        };
        let byline = [it.dc_creator.as_deref(), it.author.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|a| !a.is_empty());
        let source_label = match byline {
            Some(author) => format!("{feed_name} ({author})"),
            None => feed_name.to_string(),
        };
        out.push(CandidateArticle {
            title,
            body_text: it.description.as_deref().map(html_to_text).unwrap_or_default(),
            source_label,
            url: it.link.unwrap_or_else(|| key.clone()),
            external_id: format!("{prefix}-{key}"),
            published_at: it.pub_date.unwrap_or_default(),
            topics: it.categories.into_iter().map(|c| c.trim().to_string()).collect(),
        });
    }
    Ok(out)
}

#[derive(Debug)]
pub struct RssSource {
    client: reqwest::Client,
    name: String,
    url: String,
    prefix: String,
}

impl RssSource {
    pub fn new(client: reqwest::Client, name: String, url: String, prefix: String) -> Self {
        Self {
            client,
            name,
            url,
            prefix,
        }
    }
}

impl FetchArticles for RssSource {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(level = "info", skip_all, fields(source = %self.name, url = %self.url))]
    async fn try_fetch(&self) -> Result<Vec<CandidateArticle>, SourceError> {
        let body = get_text_with_backoff(&self.client, &self.url).await?;
        parse_feed(&body, &self.name, &self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Frontend Weekly</title>
    <link>https://frontend.example.com</link>
    <item>
      <title>Container queries are here&nbsp;to stay</title>
      <link>https://frontend.example.com/posts/container-queries</link>
      <guid>fw-101</guid>
      <pubDate>Fri, 17 Oct 2025 09:00:00 GMT</pubDate>
      <author>Sam</author>
      <category>CSS</category>
      <category>Layout</category>
      <description>&lt;p&gt;Size components by their &lt;b&gt;container&lt;/b&gt;.&lt;/p&gt;</description>
    </item>
    <item>
      <title>Untracked item</title>
    </item>
    <item>
      <title>Link only</title>
      <link>https://frontend.example.com/posts/link-only</link>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_feed() {
        let items = parse_feed(FEED, "Frontend Weekly", "few").unwrap();
        assert_eq!(items.len(), 2);

        let first = &items[0];
        assert_eq!(first.title, "Container queries are here to stay");
        assert_eq!(first.external_id, "few-fw-101");
        assert_eq!(first.source_label, "Frontend Weekly (Sam)");
        assert_eq!(first.topics, vec!["CSS", "Layout"]);
        assert_eq!(first.body_text, "Size components by their container .");
        assert_eq!(first.published_at, "Fri, 17 Oct 2025 09:00:00 GMT");

        let second = &items[1];
        assert_eq!(second.external_id, "few-https://frontend.example.com/posts/link-only");
        assert_eq!(second.source_label, "Frontend Weekly");
        assert!(second.topics.is_empty());
    }

    #[test]
    fn test_dc_creator_preferred_over_author() {
        let xml = r#"<rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel>
    <item>
      <title>Rust news</title>
      <link>https://news.example.com/rust</link>
      <author>editor@example.com</author>
      <dc:creator>Sam</dc:creator>
    </item>
    <item>
      <title>Only an author</title>
      <guid isPermaLink="false">abc-1</guid>
      <author>editor@example.com</author>
    </item>
  </channel>
</rss>"#;
        let items = parse_feed(xml, "News", "f").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].source_label, "News (Sam)");
        assert_eq!(items[1].source_label, "News (editor@example.com)");
        assert_eq!(items[1].external_id, "f-abc-1");
    }

    #[test]
    fn test_parse_feed_rejects_non_rss() {
        assert!(parse_feed("<html><body>maintenance</body></html>", "X", "x").is_err());
    }
}
