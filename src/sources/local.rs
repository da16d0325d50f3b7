//! Offline placeholder catalog.
//!
//! Produces a small fixed set of evergreen candidates without touching the
//! network. It is only wired in when `local_fallback` is enabled, and always
//! runs last, so synthetic content is saved only when every real source came
//! up empty. Ids are stable (`local-<slug>`), so each entry is saved at most once.

use super::FetchArticles;
use crate::error::SourceError;
use crate::models::CandidateArticle;
use crate::utils::slugify_title;

struct Entry {
    title: &'static str,
    body: &'static str,
    url: &'static str,
    topics: &'static [&'static str],
}

const CATALOG: &[Entry] = &[
    Entry {
        title: "JavaScript Array Methods Worth Memorizing",
        body: "map, filter, reduce, flatMap, at and findLast cover most everyday data reshaping without a single loop.",
        url: "https://developer.mozilla.org/en-US/docs/Web/JavaScript/Reference/Global_Objects/Array",
        topics: &["javascript", "webdev"],
    },
    Entry {
        title: "Async/Await Error Handling Patterns",
        body: "Wrap awaited calls in try/catch at the boundary, use Promise.allSettled for fan-out, and never leave a rejected promise unobserved.",
        url: "https://developer.mozilla.org/en-US/docs/Learn/JavaScript/Asynchronous/Promises",
        topics: &["javascript", "node"],
    },
    Entry {
        title: "TypeScript Utility Types in Practice",
        body: "Partial, Pick, Omit, Record and ReturnType remove most hand-written mapped types from application code.",
        url: "https://www.typescriptlang.org/docs/handbook/utility-types.html",
        topics: &["typescript", "javascript"],
    },
    Entry {
        title: "CSS Grid Layouts Without Media Queries",
        body: "repeat(auto-fit, minmax()) lets a grid reflow by available width, and container queries handle the remaining component-level cases.",
        url: "https://developer.mozilla.org/en-US/docs/Web/CSS/CSS_grid_layout",
        topics: &["css", "webdev"],
    },
    Entry {
        title: "React Hooks Rules Explained",
        body: "Hooks must run unconditionally and in the same order on every render; custom hooks compose that guarantee.",
        url: "https://react.dev/reference/rules/rules-of-hooks",
        topics: &["react", "javascript"],
    },
    Entry {
        title: "Ownership and Borrowing in Rust",
        body: "Each value has one owner; references borrow without taking ownership, and the borrow checker rejects aliasing mutation at compile time.",
        url: "https://doc.rust-lang.org/book/ch04-00-understanding-ownership.html",
        topics: &["rust"],
    },
];

#[derive(Debug)]
pub struct LocalSource {
    topics: Vec<String>,
}

impl LocalSource {
    pub fn new(topics: Vec<String>) -> Self {
        Self { topics }
    }

    fn entry_to_candidate(entry: &Entry) -> CandidateArticle {
        CandidateArticle {
            title: entry.title.to_string(),
            body_text: entry.body.to_string(),
            source_label: "Local catalog".to_string(),
            url: entry.url.to_string(),
            external_id: format!("local-{}", slugify_title(entry.title)),
            published_at: String::new(),
            topics: entry.topics.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl FetchArticles for LocalSource {
    fn name(&self) -> &str {
        "local"
    }

    /// Entries tagged with a configured topic come first, catalog order otherwise.
    async fn try_fetch(&self) -> Result<Vec<CandidateArticle>, SourceError> {
        let wanted: Vec<String> = self.topics.iter().map(|t| t.trim().to_lowercase()).collect();
        let (mut matching, rest): (Vec<_>, Vec<_>) = CATALOG
            .iter()
            .partition(|e| e.topics.iter().any(|t| wanted.iter().any(|w| w == t)));
        matching.extend(rest);
        Ok(matching.into_iter().map(Self::entry_to_candidate).collect())
    }
}
