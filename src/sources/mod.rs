//! Content source adapters.
//!
//! Each adapter fetches from one upstream and normalizes what it gets into
//! [`CandidateArticle`]s. Adapters own their retry, pagination and tag
//! rotation; the orchestrator only sees the [`FetchArticles::fetch`] boundary,
//! which never fails.
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Id prefix |
//! |--------|--------|--------|-----------|
//! | DEV Community | [`devto`] | Public articles API, rotating tags | `devto-` |
//! | Hacker News | [`hackernews`] | Firebase API, items fetched concurrently | `hn-` |
//! | Lobsters | [`lobsters`] | `hottest.json` | `lob-` |
//! | Any RSS 2.0 feed | [`rss`] | XML feed | configured |
//! | Local catalog | [`local`] | No network, opt-in fallback | `local-` |

pub mod devto;
pub mod hackernews;
pub mod local;
pub mod lobsters;
pub mod rss;

use crate::config::{Config, SourceConfig};
use crate::error::SourceError;
use crate::models::CandidateArticle;
use scraper::Html;
use tracing::{info, warn};

/// Uniform contract of a content source.
pub trait FetchArticles {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Fetch and normalize candidates, reporting failures.
    async fn try_fetch(&self) -> Result<Vec<CandidateArticle>, SourceError>;

    /// Fetch candidates for one run.
    ///
    /// # Returns
    ///
    /// The candidates in the order the upstream ranked them. Network,
    /// decoding and empty-payload failures are logged at warn and yield an
    /// empty list, so a broken source never aborts the run.
    async fn fetch(&self) -> Vec<CandidateArticle> {
        match self.try_fetch().await {
            Ok(candidates) => {
                info!(source = self.name(), count = candidates.len(), "Fetched candidates");
                candidates
            }
            Err(e) => {
                warn!(source = self.name(), error = %e, "Source failed; treating as empty");
                Vec::new()
            }
        }
    }
}

/// The concrete adapters, dispatched statically.
#[derive(Debug)]
pub enum Source {
    Devto(devto::DevtoSource),
    Hackernews(hackernews::HackerNewsSource),
    Lobsters(lobsters::LobstersSource),
    Rss(rss::RssSource),
    Local(local::LocalSource),
}

impl FetchArticles for Source {
    fn name(&self) -> &str {
        match self {
            Source::Devto(s) => s.name(),
            Source::Hackernews(s) => s.name(),
            Source::Lobsters(s) => s.name(),
            Source::Rss(s) => s.name(),
            Source::Local(s) => s.name(),
        }
    }

    async fn try_fetch(&self) -> Result<Vec<CandidateArticle>, SourceError> {
        match self {
            Source::Devto(s) => s.try_fetch().await,
            Source::Hackernews(s) => s.try_fetch().await,
            Source::Lobsters(s) => s.try_fetch().await,
            Source::Rss(s) => s.try_fetch().await,
            Source::Local(s) => s.try_fetch().await,
        }
    }
}

/// Build the prioritized adapter chain from configuration.
///
/// # Arguments
///
/// * `config` - Validated configuration; `sources` order is priority order.
/// * `client` - HTTP client shared by every network adapter.
///
/// # Returns
///
/// One [`Source`] per configured entry, followed by the local catalog when
/// `local_fallback` is set.
pub fn from_config(config: &Config, client: &reqwest::Client) -> Vec<Source> {
    let mut sources: Vec<Source> = config
        .sources
        .iter()
        .map(|sc| match sc {
            SourceConfig::Devto {
                tags,
                per_page,
                top_days,
            } => Source::Devto(devto::DevtoSource::new(
                client.clone(),
                tags.clone(),
                *per_page,
                *top_days,
            )),
            SourceConfig::Hackernews { limit } => {
                Source::Hackernews(hackernews::HackerNewsSource::new(client.clone(), *limit))
            }
            SourceConfig::Lobsters { url } => {
                Source::Lobsters(lobsters::LobstersSource::new(client.clone(), url.clone()))
            }
            SourceConfig::Rss { name, url, prefix } => Source::Rss(rss::RssSource::new(
                client.clone(),
                name.clone(),
                url.clone(),
                prefix.clone(),
            )),
        })
        .collect();

    if config.local_fallback {
        sources.push(Source::Local(local::LocalSource::new(config.topics.clone())));
    }
    sources
}

/// Flatten an HTML fragment to whitespace-normalized text.
pub fn html_to_text(fragment: &str) -> String {
    if fragment.is_empty() {
        return String::new();
    }
    let doc = Html::parse_fragment(fragment);
    doc.root_element()
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl FetchArticles for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        async fn try_fetch(&self) -> Result<Vec<CandidateArticle>, SourceError> {
            Err(SourceError::Empty("upstream down".to_string()))
        }
    }

    #[tokio::test]
    async fn test_fetch_swallows_errors() {
        assert!(Broken.fetch().await.is_empty());
    }

    #[test]
    fn test_html_to_text() {
        assert_eq!(
            html_to_text("<p>Hello&nbsp;<b>world</b></p>\n<p>again &amp; again</p>"),
            "Hello world again & again"
        );
        assert_eq!(html_to_text(""), "");
    }

    #[test]
    fn test_from_config_order_and_fallback() {
        let client = reqwest::Client::new();
        let mut config = Config::default();
        config.local_fallback = true;
        let sources = from_config(&config, &client);
        let names: Vec<&str> = sources.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["devto", "hackernews", "lobsters", "local"]);

        config.local_fallback = false;
        assert_eq!(from_config(&config, &client).len(), 3);
    }
}
