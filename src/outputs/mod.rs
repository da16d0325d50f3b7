//! Persisting an accepted article.
//!
//! # Submodules
//!
//! - [`markdown`]: Renders and writes the article file
//! - [`indexes`]: Appends the article to `INDEX.md`
//! - [`git`]: Optionally commits and pushes the archive
//!
//! # Output Structure
//!
//! ```text
//! archive_dir/
//! ├── 2026-10-17.md
//! ├── 2026-10-18.md
//! ├── 2026-10-18-some-second-article.md
//! └── INDEX.md
//! ```

pub mod git;
pub mod indexes;
pub mod markdown;

use crate::models::CandidateArticle;
use chrono::NaiveDate;
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{error, instrument};

/// Where an article ended up and whether the index now lists it.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedArticle {
    pub path: PathBuf,
    pub file_name: String,
    pub indexed: bool,
}

impl SavedArticle {
    /// Paths to stage, relative to the archive directory. `INDEX.md` is only
    /// included when this run updated it.
    pub fn commit_paths(&self) -> Vec<&Path> {
        let mut paths = vec![Path::new(&self.file_name)];
        if self.indexed {
            paths.push(Path::new(indexes::INDEX_FILE));
        }
        paths
    }
}

/// Write the article file and append it to the archive index.
///
/// # Arguments
///
/// * `archive_dir` - The archive directory; must already exist.
/// * `date` - Run date, used for the file name and the index line.
/// * `article` - The accepted candidate.
///
/// # Returns
///
/// A [`SavedArticle`]. An index failure is logged and reported through
/// [`SavedArticle::indexed`] rather than failing the save.
///
/// # Errors
///
/// Returns an error if the article file itself cannot be written.
#[instrument(level = "info", skip_all, fields(id = %article.external_id))]
pub async fn save_article(
    archive_dir: &Path,
    date: NaiveDate,
    article: &CandidateArticle,
) -> Result<SavedArticle, Box<dyn Error>> {
    let path = markdown::write_article(archive_dir, date, article).await?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or("article path has no file name")?
        .to_string();

    let indexed = match indexes::update_archive_index(archive_dir, date, article, &file_name).await {
        Ok(()) => true,
        Err(e) => {
            error!(error = %e, "Failed to update archive index");
            false
        }
    };

    Ok(SavedArticle {
        path,
        file_name,
        indexed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[tokio::test]
    async fn test_save_article_indexes_and_stages_both_files() {
        let tmp = tempfile::tempdir().unwrap();
        let c = candidate("hn-1", "Rust in production", "", &[]);
        let saved = save_article(tmp.path(), date(), &c).await.unwrap();

        assert!(saved.indexed);
        assert_eq!(saved.file_name, "2026-10-18.md");
        assert_eq!(
            saved.commit_paths(),
            vec![Path::new("2026-10-18.md"), Path::new("INDEX.md")]
        );
        assert!(tmp.path().join("INDEX.md").is_file());
    }

    #[tokio::test]
    async fn test_index_failure_keeps_article_and_unstages_index() {
        let tmp = tempfile::tempdir().unwrap();
        // A directory in place of the index file makes the append fail.
        std::fs::create_dir(tmp.path().join("INDEX.md")).unwrap();
        let c = candidate("hn-2", "Rust in production", "", &[]);
        let saved = save_article(tmp.path(), date(), &c).await.unwrap();

        assert!(!saved.indexed);
        assert!(saved.path.is_file());
        assert_eq!(saved.commit_paths(), vec![Path::new("2026-10-18.md")]);
    }
}
