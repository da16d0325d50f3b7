//! # Daily Tech Article
//!
//! Picks at most one technology article per run from a prioritized list of
//! content sources, keeps it only if it matches the topic allow-list and is
//! not a near-duplicate of something already archived, and hands it back to
//! the caller for saving.
//!
//! ## Architecture
//!
//! 1. **Similarity** ([`similarity`]): token-set Jaccard score
//! 2. **Archive** ([`archive`]): snapshot of saved articles and duplicate checks
//! 3. **Relevance** ([`relevance`]): topic allow-list filter
//! 4. **Sources** ([`sources`]): dev.to, Hacker News, Lobsters, RSS, local catalog
//! 5. **Orchestrator** ([`orchestrator`]): first acceptable candidate wins
//!
//! Persisting the result (Markdown file, index line, git commit) lives in
//! [`outputs`] and is driven by the binary.

pub mod api;
pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod outputs;
pub mod relevance;
pub mod similarity;
pub mod sources;
pub mod utils;

pub use archive::ArchiveIndex;
pub use models::{CandidateArticle, RunResult};
pub use orchestrator::Orchestrator;
