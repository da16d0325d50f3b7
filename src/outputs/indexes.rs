//! Archive index file (`INDEX.md`).
//!
//! One line is appended per saved article; the header is written when the
//! file is first created.

use crate::models::CandidateArticle;
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::Write;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument};

pub const INDEX_FILE: &str = "INDEX.md";

/// Append an entry for `article` (stored as `file_name`) to the archive index.
#[instrument(level = "info", skip_all, fields(archive_dir = %archive_dir.display(), %file_name))]
pub async fn update_archive_index(
    archive_dir: &Path,
    date: NaiveDate,
    article: &CandidateArticle,
    file_name: &str,
) -> Result<(), Box<dyn Error>> {
    let index_path = archive_dir.join(INDEX_FILE);
    let mut index_md = String::new();

    if !fs::try_exists(&index_path).await? {
        writeln!(index_md, "# Article archive\n")?;
    }

    writeln!(
        index_md,
        "- {}: [{}](./{}) <small>`{}`</small>",
        date,
        article.title.trim(),
        file_name,
        article.source_label
    )?;

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&index_path)
        .await?;
    file.write_all(index_md.as_bytes()).await?;
    info!(path = %index_path.display(), "Updated archive index");
    Ok(())
}
