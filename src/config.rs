//! Run configuration loaded from YAML.
//!
//! ```yaml
//! topics: [javascript, typescript, rust]
//! local_fallback: false
//! fetch_timeout_secs: 30
//! sources:
//!   - kind: devto
//!     tags: [javascript, webdev]
//!   - kind: hackernews
//!     limit: 30
//!   - kind: lobsters
//!   - kind: rss
//!     name: CSS-Tricks
//!     url: https://css-tricks.com/feed/
//!     prefix: csst
//! ```
//!
//! The order of `sources` is the priority order of a run.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};

pub const DEFAULT_USER_AGENT: &str = concat!("daily_tech_article/", env!("CARGO_PKG_VERSION"));

/// One entry in the prioritized source list.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    Devto {
        #[serde(default = "default_devto_tags")]
        tags: Vec<String>,
        #[serde(default = "default_per_page")]
        per_page: usize,
        /// Restrict to articles trending over the last N days.
        #[serde(default = "default_top_days")]
        top_days: u32,
    },
    Hackernews {
        #[serde(default = "default_hn_limit")]
        limit: usize,
    },
    Lobsters {
        #[serde(default = "default_lobsters_url")]
        url: String,
    },
    Rss {
        name: String,
        url: String,
        /// Namespace token for `external_id`.
        prefix: String,
    },
}

impl SourceConfig {
    /// Name used in validation errors.
    pub fn label(&self) -> &str {
        match self {
            SourceConfig::Devto { .. } => "devto",
            SourceConfig::Hackernews { .. } => "hackernews",
            SourceConfig::Lobsters { .. } => "lobsters",
            SourceConfig::Rss { name, .. } => name,
        }
    }
}

fn default_devto_tags() -> Vec<String> {
    ["javascript", "webdev", "typescript", "react", "node"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_per_page() -> usize {
    10
}

fn default_top_days() -> u32 {
    1
}

fn default_hn_limit() -> usize {
    30
}

fn default_lobsters_url() -> String {
    "https://lobste.rs/hottest.json".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_topics() -> Vec<String> {
    ["javascript", "typescript", "node", "react", "webdev", "web", "css", "rust"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig::Devto {
            tags: default_devto_tags(),
            per_page: default_per_page(),
            top_days: default_top_days(),
        },
        SourceConfig::Hackernews {
            limit: default_hn_limit(),
        },
        SourceConfig::Lobsters {
            url: default_lobsters_url(),
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_topics")]
    pub topics: Vec<String>,
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,
    /// Append the offline placeholder catalog as the last source.
    #[serde(default)]
    pub local_fallback: bool,
    /// Upper bound for one adapter's whole `fetch()`.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    /// Per-request timeout of the HTTP client.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            topics: default_topics(),
            sources: default_sources(),
            local_fallback: false,
            fetch_timeout_secs: default_fetch_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    pub fn from_yaml(s: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or fall back to the built-in defaults when `None`.
    #[instrument(level = "info", skip_all)]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            info!("No config file given; using built-in defaults");
            let config = Config::default();
            config.validate()?;
            return Ok(config);
        };
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&content)?;
        info!(
            path = %path.display(),
            sources = config.sources.len(),
            topics = config.topics.len(),
            local_fallback = config.local_fallback,
            "Loaded configuration"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.topics.iter().all(|t| t.trim().is_empty()) {
            return Err(ConfigError::NoTopics);
        }
        if self.sources.is_empty() && !self.local_fallback {
            return Err(ConfigError::NoSources);
        }
        for (index, source) in self.sources.iter().enumerate() {
            let invalid = |reason: &str| ConfigError::InvalidSource {
                index,
                reason: format!("{}: {reason}", source.label()),
            };
            match source {
                SourceConfig::Devto { tags, per_page, .. } => {
                    if tags.iter().all(|t| t.trim().is_empty()) {
                        return Err(invalid("needs at least one tag"));
                    }
                    if *per_page == 0 {
                        return Err(invalid("per_page must be positive"));
                    }
                }
                SourceConfig::Hackernews { limit } if *limit == 0 => {
                    return Err(invalid("limit must be positive"));
                }
                SourceConfig::Hackernews { .. } => {}
                SourceConfig::Lobsters { url } => {
                    url::Url::parse(url).map_err(|e| invalid(&format!("url: {e}")))?;
                }
                SourceConfig::Rss { url, prefix, .. } => {
                    url::Url::parse(url).map_err(|e| invalid(&format!("url: {e}")))?;
                    if prefix.trim().is_empty() || prefix.contains('-') {
                        return Err(invalid("prefix must be a non-empty token without '-'"));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
