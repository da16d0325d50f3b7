//! Acquisition run: tries sources in priority order and picks the first
//! candidate that is on-topic and not already archived.
//!
//! ```text
//! TryingSource(0) -> Accepted
//!                 -> TryingSource(1) -> Accepted
//!                                    -> ... -> Exhausted
//! ```
//!
//! Selection is pass/fail only: the first candidate, in source priority
//! order and then in the order the source returned them, that passes both
//! the topic filter and the archive check wins. The orchestrator never
//! writes; the caller persists an accepted candidate.

use crate::archive::ArchiveIndex;
use crate::error::ConfigError;
use crate::models::{CandidateArticle, RunResult};
use crate::relevance::TopicAllowList;
use crate::sources::FetchArticles;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

pub struct Orchestrator<S> {
    sources: Vec<S>,
    topics: TopicAllowList,
    archive: ArchiveIndex,
    fetch_timeout: Duration,
}

impl<S: FetchArticles> Orchestrator<S> {
    /// Build an orchestrator over `sources`, tried in the given order.
    ///
    /// # Arguments
    ///
    /// * `sources` - Adapters in priority order, highest first.
    /// * `topics` - Allow-list entries; normalized by [`TopicAllowList::new`].
    /// * `archive` - Snapshot of already saved articles.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoSources`] or [`ConfigError::NoTopics`] when
    /// either list is empty after normalization.
    pub fn new<T: AsRef<str>>(
        sources: Vec<S>,
        topics: impl IntoIterator<Item = T>,
        archive: ArchiveIndex,
    ) -> Result<Self, ConfigError> {
        if sources.is_empty() {
            return Err(ConfigError::NoSources);
        }
        let topics = TopicAllowList::new(topics);
        if topics.is_empty() {
            return Err(ConfigError::NoTopics);
        }
        Ok(Self {
            sources,
            topics,
            archive,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        })
    }

    /// Bound each source's whole fetch; a timeout counts as an empty result.
    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    /// Run one acquisition.
    ///
    /// Sources are fetched one at a time, each bounded by the fetch timeout.
    /// A failing or timed-out source contributes no candidates.
    ///
    /// # Returns
    ///
    /// [`RunResult::Accepted`] with the first candidate that is well formed,
    /// on-topic and not archived, or [`RunResult::Exhausted`] when every
    /// source is used up.
    #[instrument(level = "info", skip_all, fields(sources = self.sources.len(), archived = self.archive.len()))]
    pub async fn run(&self) -> RunResult {
        let t0 = Instant::now();

        for (priority, source) in self.sources.iter().enumerate() {
            info!(priority, source = source.name(), "Trying source");
            let candidates = match timeout(self.fetch_timeout, source.fetch()).await {
                Ok(candidates) => candidates,
                Err(_) => {
                    warn!(
                        source = source.name(),
                        timeout_secs = self.fetch_timeout.as_secs(),
                        "Source timed out; treating as empty"
                    );
                    Vec::new()
                }
            };

            if let Some(accepted) = self.select(source.name(), candidates) {
                info!(
                    source = source.name(),
                    id = %accepted.external_id,
                    title = %accepted.title,
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    "Accepted candidate"
                );
                return RunResult::Accepted(accepted);
            }
            info!(source = source.name(), "No acceptable candidate; moving on");
        }

        info!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "All sources exhausted"
        );
        RunResult::Exhausted
    }

    /// First candidate from one source that survives every check.
    fn select(&self, source: &str, candidates: Vec<CandidateArticle>) -> Option<CandidateArticle> {
        let mut irrelevant = 0usize;
        let mut duplicates = 0usize;

        for candidate in candidates {
            if !candidate.is_well_formed() {
                warn!(source, id = %candidate.external_id, "Malformed candidate; skipping");
                continue;
            }
            if !self.topics.is_relevant(&candidate) {
                irrelevant += 1;
                debug!(source, id = %candidate.external_id, title = %candidate.title, "Off-topic");
                continue;
            }
            if let Some(dup) = self.archive.duplicate_of(&candidate) {
                duplicates += 1;
                info!(
                    source,
                    id = %candidate.external_id,
                    title = %candidate.title,
                    reason = ?dup.reason,
                    archived = %dup.record.path.display(),
                    "Rejected duplicate"
                );
                continue;
            }
            return Some(candidate);
        }

        debug!(source, irrelevant, duplicates, "Source yielded nothing new");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::models::{ArchiveRecord, candidate};
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Scripted {
        Returns(&'static str, Vec<CandidateArticle>),
        Fails(&'static str),
        Hangs(&'static str),
    }

    impl FetchArticles for Scripted {
        fn name(&self) -> &str {
            match self {
                Scripted::Returns(n, _) | Scripted::Fails(n) | Scripted::Hangs(n) => n,
            }
        }

        async fn try_fetch(&self) -> Result<Vec<CandidateArticle>, SourceError> {
            match self {
                Scripted::Returns(_, items) => Ok(items.clone()),
                Scripted::Fails(_) => Err(SourceError::Empty("connection reset".to_string())),
                Scripted::Hangs(_) => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(Vec::new())
                }
            }
        }
    }

    struct Counting<'a> {
        calls: &'a AtomicUsize,
        items: Vec<CandidateArticle>,
    }

    impl FetchArticles for Counting<'_> {
        fn name(&self) -> &str {
            "counting"
        }

        async fn try_fetch(&self) -> Result<Vec<CandidateArticle>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.items.clone())
        }
    }

    fn archived(id: &str, title: &str) -> ArchiveIndex {
        ArchiveIndex::from_records(vec![ArchiveRecord {
            stored_id: Some(id.to_string()),
            stored_title: title.to_string(),
            stored_body: String::new(),
            path: PathBuf::from("articles/2025-01-01.md"),
        }])
    }

    fn topics() -> Vec<&'static str> {
        vec!["javascript"]
    }

    #[test]
    fn test_empty_sources_is_config_error() {
        let err = Orchestrator::<Scripted>::new(vec![], topics(), ArchiveIndex::default())
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::NoSources));
    }

    #[test]
    fn test_empty_topics_is_config_error() {
        let sources = vec![Scripted::Returns("a", vec![])];
        let err = Orchestrator::new(sources, ["  ", ""], ArchiveIndex::default())
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::NoTopics));
    }

    #[tokio::test]
    async fn test_priority_order_wins() {
        let a = candidate("devto-1", "JavaScript from A", "", &[]);
        let b = candidate("hn-1", "JavaScript from B", "", &[]);
        let orch = Orchestrator::new(
            vec![Scripted::Returns("a", vec![a.clone()]), Scripted::Returns("b", vec![b])],
            topics(),
            ArchiveIndex::default(),
        )
        .unwrap();
        assert_eq!(orch.run().await, RunResult::Accepted(a));
    }

    #[tokio::test]
    async fn test_within_source_order_wins() {
        let first = candidate("devto-1", "JavaScript closures", "", &[]);
        let second = candidate("devto-2", "JavaScript modules", "", &[]);
        let orch = Orchestrator::new(
            vec![Scripted::Returns("a", vec![first.clone(), second])],
            topics(),
            ArchiveIndex::default(),
        )
        .unwrap();
        assert_eq!(orch.run().await, RunResult::Accepted(first));
    }

    #[tokio::test]
    async fn test_failing_source_falls_through() {
        let b = candidate("hn-7", "Shipping JavaScript faster", "", &[]);
        let orch = Orchestrator::new(
            vec![Scripted::Fails("a"), Scripted::Returns("b", vec![b.clone()])],
            topics(),
            ArchiveIndex::default(),
        )
        .unwrap();
        assert_eq!(orch.run().await, RunResult::Accepted(b));
    }

    #[tokio::test]
    async fn test_hung_source_times_out() {
        let b = candidate("hn-7", "Shipping JavaScript faster", "", &[]);
        let orch = Orchestrator::new(
            vec![Scripted::Hangs("slow"), Scripted::Returns("b", vec![b.clone()])],
            topics(),
            ArchiveIndex::default(),
        )
        .unwrap()
        .with_fetch_timeout(Duration::from_millis(50));
        assert_eq!(orch.run().await, RunResult::Accepted(b));
    }

    #[tokio::test]
    async fn test_irrelevant_and_duplicates_exhaust() {
        let archive = archived("devto-123", "Modern Javascript Features You Should Know");
        let orch = Orchestrator::new(
            vec![
                Scripted::Returns(
                    "a",
                    vec![
                        candidate("devto-123", "JavaScript anything", "", &[]),
                        candidate("devto-5", "Gardening tips", "", &["garden"]),
                    ],
                ),
                Scripted::Returns(
                    "b",
                    vec![candidate(
                        "hn-9",
                        "Modern JavaScript Features You Should Know in 2024",
                        "",
                        &[],
                    )],
                ),
                Scripted::Fails("c"),
            ],
            topics(),
            archive,
        )
        .unwrap();
        assert_eq!(orch.run().await, RunResult::Exhausted);
    }

    #[tokio::test]
    async fn test_duplicate_skipped_for_next_candidate() {
        let archive = archived("devto-123", "Modern Javascript Features You Should Know");
        let fresh = candidate("devto-999", "Understanding JavaScript generators", "", &[]);
        let orch = Orchestrator::new(
            vec![Scripted::Returns(
                "a",
                vec![candidate("devto-123", "Whatever", "", &["javascript"]), fresh.clone()],
            )],
            topics(),
            archive,
        )
        .unwrap();
        assert_eq!(orch.run().await, RunResult::Accepted(fresh));
    }

    #[tokio::test]
    async fn test_tag_match_and_malformed_skip() {
        let tagged = candidate("lob-x1", "Ten years of frontend", "", &["JavaScript"]);
        let orch = Orchestrator::new(
            vec![Scripted::Returns(
                "a",
                vec![candidate("noprefix", "JavaScript!", "", &[]), tagged.clone()],
            )],
            topics(),
            ArchiveIndex::default(),
        )
        .unwrap();
        assert_eq!(orch.run().await, RunResult::Accepted(tagged));
    }

    #[tokio::test]
    async fn test_stops_at_first_accepting_source() {
        let calls = AtomicUsize::new(0);
        let orch = Orchestrator::new(
            vec![
                Counting {
                    calls: &calls,
                    items: vec![candidate("devto-1", "JavaScript wins", "", &[])],
                },
                Counting {
                    calls: &calls,
                    items: vec![candidate("devto-2", "JavaScript never fetched", "", &[])],
                },
            ],
            topics(),
            ArchiveIndex::default(),
        )
        .unwrap();
        assert!(matches!(orch.run().await, RunResult::Accepted(c) if c.external_id == "devto-1"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
