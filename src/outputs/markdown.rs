//! Markdown rendering of an accepted article.
//!
//! The layout is the one [`crate::archive::parse_record`] reads back:
//! title heading, description, `---` separator, then metadata including the
//! `Article ID` marker. Body lines that would read as a separator or a marker
//! are backslash-escaped.

use crate::archive::escape_body_line;
use crate::models::CandidateArticle;
use crate::utils::slugify_title;
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Render the article file body.
pub fn article_to_markdown(article: &CandidateArticle) -> String {
    let mut md = String::new();
    writeln!(md, "# {}\n", article.title.trim()).unwrap();
    if !article.body_text.trim().is_empty() {
        for line in article.body_text.trim().lines() {
            writeln!(md, "{}", escape_body_line(line)).unwrap();
        }
        writeln!(md).unwrap();
    }
    writeln!(md, "---\n").unwrap();
    writeln!(md, "**Article ID:** {}\n", article.external_id).unwrap();
    writeln!(md, "**Source:** {}\n", article.source_label).unwrap();
    if !article.published_at.is_empty() {
        writeln!(md, "**Published:** {}\n", article.published_at).unwrap();
    }
    if !article.topics.is_empty() {
        writeln!(md, "**Tags:** {}\n", article.topics.join(", ")).unwrap();
    }
    writeln!(md, "**Link:** [Read the original]({})", article.url).unwrap();
    md
}

/// `<date>.md`, or `<date>-<slug>.md` when a file for that date already exists.
pub fn article_file_name(archive_dir: &Path, date: NaiveDate, title: &str) -> String {
    let plain = format!("{date}.md");
    if !archive_dir.join(&plain).exists() {
        return plain;
    }
    let slug = slugify_title(title);
    let slug = if slug.is_empty() { "article".to_string() } else { slug };
    let mut name = format!("{date}-{slug}.md");
    let mut n = 2;
    while archive_dir.join(&name).exists() {
        name = format!("{date}-{slug}-{n}.md");
        n += 1;
    }
    name
}

/// Write the article into the archive.
///
/// # Arguments
///
/// * `archive_dir` - Directory the file is written to; must already exist.
/// * `date` - Run date used for the file name.
/// * `article` - The accepted candidate.
///
/// # Returns
///
/// The path of the new file. See [`article_file_name`] for collisions.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
#[instrument(level = "info", skip_all, fields(archive_dir = %archive_dir.display(), id = %article.external_id))]
pub async fn write_article(
    archive_dir: &Path,
    date: NaiveDate,
    article: &CandidateArticle,
) -> Result<PathBuf, Box<dyn Error>> {
    let file_name = article_file_name(archive_dir, date, &article.title);
    let path = archive_dir.join(file_name);
    fs::write(&path, article_to_markdown(article)).await?;
    info!(path = %path.display(), "Wrote article");
    Ok(path)
}
