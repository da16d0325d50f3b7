//! Archive index over previously saved articles.
//!
//! The archive is a directory of Markdown files written by
//! [`crate::outputs::markdown`]. Each file is parsed back into an
//! [`ArchiveRecord`] using three markers:
//!
//! ```text
//! # <title>                 <- stored_title (first non-blank line)
//! <description ...>         <- stored_body
//! ---                       <- separator
//! **Article ID:** devto-1   <- stored_id
//! ...trailing metadata...
//! ```
//!
//! The index is loaded once per run and treated as an immutable snapshot;
//! every candidate is compared against it in memory.

use crate::models::{ArchiveRecord, CandidateArticle};
use crate::similarity::similarity;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument, warn};

/// Titles scoring strictly above this are considered the same article.
pub const TITLE_SIMILARITY_THRESHOLD: f64 = 0.8;
/// Bodies scoring strictly above this are considered the same article.
pub const BODY_SIMILARITY_THRESHOLD: f64 = 0.7;

/// Files the driver generates next to the articles; never parsed as records.
pub const RESERVED_FILES: [&str; 2] = ["INDEX.md", "README.md"];

const ID_MARKER: &str = "Article ID:";
const SEPARATOR: &str = "---";

/// Which rule flagged a candidate as a duplicate.
#[derive(Debug, Clone, PartialEq)]
pub enum DuplicateReason {
    SameId,
    SimilarTitle(f64),
    SimilarBody(f64),
}

/// A duplicate match: the reason plus the record it matched.
#[derive(Debug, Clone, PartialEq)]
pub struct Duplicate<'a> {
    pub reason: DuplicateReason,
    pub record: &'a ArchiveRecord,
}

#[derive(Debug, Default, Clone)]
pub struct ArchiveIndex {
    records: Vec<ArchiveRecord>,
}

impl ArchiveIndex {
    pub fn from_records(records: Vec<ArchiveRecord>) -> Self {
        Self { records }
    }

    /// Scan `dir` and build an index snapshot.
    ///
    /// # Arguments
    ///
    /// * `dir` - The archive directory. Created when missing.
    ///
    /// # Returns
    ///
    /// An index over every eligible `*.md` file, in file-name order. A missing
    /// directory yields an empty index.
    ///
    /// # Errors
    ///
    /// Returns an error only if the directory cannot be created or listed.
    /// Individual files that cannot be read or parsed are logged and skipped.
    #[instrument(level = "info", skip_all, fields(dir = %dir.as_ref().display()))]
    pub async fn load(dir: impl AsRef<Path>) -> io::Result<Self> {
        let records = load_records(dir.as_ref(), true).await?;
        info!(count = records.len(), "Loaded archive records");
        Ok(Self { records })
    }

    /// Like [`ArchiveIndex::load`], but a missing directory is left alone.
    /// Used by dry runs, which must not touch the filesystem.
    #[instrument(level = "info", skip_all, fields(dir = %dir.as_ref().display()))]
    pub async fn load_read_only(dir: impl AsRef<Path>) -> io::Result<Self> {
        let records = load_records(dir.as_ref(), false).await?;
        info!(count = records.len(), "Loaded archive records (read-only)");
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record that makes `candidate` a duplicate, if any.
    ///
    /// Id equality is checked across the whole archive before any similarity
    /// rule, so an exact re-post is always reported as [`DuplicateReason::SameId`].
    /// Titles must score strictly above [`TITLE_SIMILARITY_THRESHOLD`] and
    /// bodies strictly above [`BODY_SIMILARITY_THRESHOLD`].
    ///
    /// # Returns
    ///
    /// The matching record and the rule that matched, or `None` when the
    /// candidate is new.
    pub fn duplicate_of(&self, candidate: &CandidateArticle) -> Option<Duplicate<'_>> {
        if let Some(record) = self
            .records
            .iter()
            .find(|r| r.stored_id.as_deref() == Some(candidate.external_id.as_str()))
        {
            return Some(Duplicate {
                reason: DuplicateReason::SameId,
                record,
            });
        }

        self.records.iter().find_map(|record| {
            let title_sim = similarity(&record.stored_title, &candidate.title);
            if title_sim > TITLE_SIMILARITY_THRESHOLD {
                return Some(Duplicate {
                    reason: DuplicateReason::SimilarTitle(title_sim),
                    record,
                });
            }
            let body_sim = similarity(&record.stored_body, &candidate.body_text);
            if body_sim > BODY_SIMILARITY_THRESHOLD {
                return Some(Duplicate {
                    reason: DuplicateReason::SimilarBody(body_sim),
                    record,
                });
            }
            None
        })
    }

    /// Shorthand for `duplicate_of(candidate).is_some()`.
    pub fn is_duplicate(&self, candidate: &CandidateArticle) -> bool {
        self.duplicate_of(candidate).is_some()
    }
}

fn is_eligible(path: &Path) -> bool {
    let is_markdown = path.extension().and_then(|e| e.to_str()) == Some("md");
    let reserved = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| RESERVED_FILES.contains(&n));
    is_markdown && !reserved
}

/// Read every eligible file under `dir` into a record, in file-name order.
///
/// Unreadable or unparseable files are logged and skipped. A missing `dir`
/// is an empty archive; it is created only when `create_missing` is set.
pub async fn load_records(dir: &Path, create_missing: bool) -> io::Result<Vec<ArchiveRecord>> {
    if !fs::try_exists(dir).await? {
        if create_missing {
            info!(dir = %dir.display(), "Archive directory missing; creating empty archive");
            fs::create_dir_all(dir).await?;
        } else {
            info!(dir = %dir.display(), "Archive directory missing; treating as empty");
        }
        return Ok(Vec::new());
    }

    let mut paths: Vec<PathBuf> = Vec::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if is_eligible(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut records = Vec::with_capacity(paths.len());
    for path in paths {
        match fs::read_to_string(&path).await {
            Ok(content) => match parse_record(&content, &path) {
                Some(record) => records.push(record),
                None => warn!(path = %path.display(), "Archive file has no title heading; skipping"),
            },
            Err(e) => warn!(path = %path.display(), error = %e, "Failed reading archive file; skipping"),
        }
    }
    Ok(records)
}

/// Parse a stored article. Returns `None` when no `# ` heading leads the file.
pub fn parse_record(content: &str, path: &Path) -> Option<ArchiveRecord> {
    let mut lines = content.lines().skip_while(|l| l.trim().is_empty());
    let stored_title = lines.next()?.trim().strip_prefix("# ")?.trim().to_string();
    if stored_title.is_empty() {
        return None;
    }

    let mut body_lines = Vec::new();
    let mut stored_id = None;
    let mut past_separator = false;
    for line in lines {
        let trimmed = line.trim();
        if !past_separator && trimmed == SEPARATOR {
            past_separator = true;
            continue;
        }
        if let Some(id) = parse_id_marker(trimmed) {
            stored_id.get_or_insert(id);
            continue;
        }
        if !past_separator {
            body_lines.push(unescape_body_line(trimmed));
        }
    }

    let stored_body = body_lines
        .into_iter()
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    if stored_id.is_none() {
        debug!(path = %path.display(), "Archive record has no Article ID marker");
    }

    Some(ArchiveRecord {
        stored_id,
        stored_title,
        stored_body,
        path: path.to_path_buf(),
    })
}

/// Body lines that the parser would otherwise read as a separator or an id
/// marker. A leading backslash on such a line is part of the escape too.
fn needs_escape(line: &str) -> bool {
    line == SEPARATOR
        || parse_id_marker(line).is_some()
        || line.strip_prefix('\\').is_some_and(needs_escape)
}

/// Escape one trimmed body line so it survives [`parse_record`] unchanged.
pub fn escape_body_line(line: &str) -> String {
    let line = line.trim();
    if needs_escape(line) {
        format!("\\{line}")
    } else {
        line.to_string()
    }
}

fn unescape_body_line(line: &str) -> &str {
    match line.strip_prefix('\\') {
        Some(rest) if needs_escape(rest) => rest,
        _ => line,
    }
}

/// `Article ID: x`, `**Article ID:** x` and `- **Article ID:** x` all yield `x`.
fn parse_id_marker(line: &str) -> Option<String> {
    let unbolded = line.trim_start_matches(['-', ' ']).replace("**", "");
    let id = unbolded.trim().strip_prefix(ID_MARKER)?.trim();
    (!id.is_empty()).then(|| id.to_string())
}
