//! Error types for source adapters and configuration.

use std::path::PathBuf;

/// Failure inside a single source adapter. Never crosses the orchestrator
/// boundary; adapters turn it into an empty candidate list.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed XML payload: {0}")]
    Xml(#[from] quick_xml::de::DeError),

    #[error("Source returned nothing usable: {0}")]
    Empty(String),
}

/// Setup mistakes that would make every run end in exhaustion. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("No content sources configured (and local fallback disabled)")]
    NoSources,

    #[error("Topic allow-list is empty")]
    NoTopics,

    #[error("Invalid source #{index}: {reason}")]
    InvalidSource { index: usize, reason: String },
}
