//! Topic allow-list filtering.

use crate::models::CandidateArticle;
use itertools::Itertools;

/// Normalized set of allowed topics: trimmed, lowercased, blanks removed,
/// first occurrence kept.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicAllowList {
    topics: Vec<String>,
}

impl TopicAllowList {
    pub fn new<I, S>(topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let topics = topics
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .unique()
            .collect();
        Self { topics }
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// True when any allowed topic occurs (case-insensitively) in the title or
    /// in any of the candidate's topic tags.
    pub fn is_relevant(&self, candidate: &CandidateArticle) -> bool {
        let title = candidate.title.to_lowercase();
        let tags: Vec<String> = candidate.topics.iter().map(|t| t.to_lowercase()).collect();

        self.topics.iter().any(|topic| {
            title.contains(topic.as_str()) || tags.iter().any(|tag| tag.contains(topic.as_str()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate;

    fn allow(topics: &[&str]) -> TopicAllowList {
        TopicAllowList::new(topics.iter().copied())
    }

    #[test]
    fn test_allow_list_normalization() {
        let list = allow(&[" JavaScript ", "", "rust", "RUST"]);
        assert_eq!(list.topics, vec!["javascript".to_string(), "rust".to_string()]);
        assert!(allow(&["  ", ""]).is_empty());
    }

    #[test]
    fn test_title_match_is_case_insensitive_substring() {
        let c = candidate("hn-1", "Why I moved our backend to RUST", "", &[]);
        assert!(allow(&["rust"]).is_relevant(&c));

        let c = candidate("hn-2", "Understanding TypeScript generics", "", &[]);
        assert!(allow(&["script"]).is_relevant(&c));
    }

    #[test]
    fn test_tag_match() {
        let c = candidate("devto-1", "Ten things I learned this year", "", &["WebDev", "career"]);
        assert!(allow(&["webdev"]).is_relevant(&c));
        assert!(allow(&["web"]).is_relevant(&c));
    }

    #[test]
    fn test_no_match() {
        let c = candidate("lob-abc", "Gardening for beginners", "", &["hobby"]);
        assert!(!allow(&["javascript", "rust"]).is_relevant(&c));
    }

    #[test]
    fn test_body_is_not_inspected() {
        let c = candidate("lob-abc", "Weekly notes", "all about javascript", &[]);
        assert!(!allow(&["javascript"]).is_relevant(&c));
    }
}
