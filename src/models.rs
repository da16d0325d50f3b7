//! Data models shared by the acquisition engine.
//!
//! This module defines the core data structures used throughout the application:
//! - [`CandidateArticle`]: A normalized article produced by a source adapter
//! - [`ArchiveRecord`]: A previously saved article, parsed back from disk
//! - [`RunResult`]: The outcome of one acquisition run

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// An article fetched from a source but not yet accepted or persisted.
///
/// Every adapter normalizes its upstream payload into this shape. The
/// `external_id` is always prefixed with the adapter's namespace token
/// (`devto-`, `hn-`, `lob-`, ...) so ids from different sources never collide.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CandidateArticle {
    /// The article headline.
    pub title: String,
    /// Summary or description text, compared against stored bodies. May be empty.
    pub body_text: String,
    /// Human-readable origin, e.g. `"DEV Community (Jane Doe)"`. Display only.
    pub source_label: String,
    /// Canonical link to the original content.
    pub url: String,
    /// Source-prefixed identifier, the primary dedup key.
    pub external_id: String,
    /// Display timestamp as provided by the upstream.
    pub published_at: String,
    /// Topic tags in upstream order.
    pub topics: Vec<String>,
}

impl CandidateArticle {
    /// A candidate is usable only with a non-empty title and a namespaced id.
    pub fn is_well_formed(&self) -> bool {
        !self.title.trim().is_empty()
            && self
                .external_id
                .split_once('-')
                .is_some_and(|(ns, rest)| !ns.is_empty() && !rest.is_empty())
    }
}

/// A saved article as reconstructed from its Markdown file.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveRecord {
    /// Value of the `Article ID:` marker line, if the file carries one.
    pub stored_id: Option<String>,
    /// The leading heading text.
    pub stored_title: String,
    /// Descriptive text between the heading and the `---` separator.
    pub stored_body: String,
    /// File the record was read from.
    pub path: PathBuf,
}

/// Outcome of one run. Exhaustion is a normal terminal state, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum RunResult {
    Accepted(CandidateArticle),
    Exhausted,
}

#[cfg(test)]
pub(crate) fn candidate(id: &str, title: &str, body: &str, topics: &[&str]) -> CandidateArticle {
    CandidateArticle {
        title: title.to_string(),
        body_text: body.to_string(),
        source_label: "Test Source".to_string(),
        url: format!("https://example.com/{id}"),
        external_id: id.to_string(),
        published_at: "Oct 18".to_string(),
        topics: topics.iter().map(|t| t.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_requires_title_and_prefixed_id() {
        assert!(candidate("devto-1", "Title", "", &[]).is_well_formed());
        assert!(!candidate("devto-1", "   ", "", &[]).is_well_formed());
        assert!(!candidate("12345", "Title", "", &[]).is_well_formed());
        assert!(!candidate("devto-", "Title", "", &[]).is_well_formed());
        assert!(!candidate("-12", "Title", "", &[]).is_well_formed());
    }

    #[test]
    fn test_candidate_serialization() {
        let c = candidate("hn-42", "Rust 2024 edition", "Body", &["rust"]);
        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains("\"external_id\":\"hn-42\""));
        assert!(json.contains("Rust 2024 edition"));
    }
}
