//! Command-line interface definitions.
//!
//! All options can be provided via command-line flags; the paths can also
//! come from environment variables.

use clap::Parser;
use std::path::PathBuf;

/// Pull one fresh, on-topic technology article into the archive.
///
/// # Examples
///
/// ```sh
/// # Defaults: ./articles, built-in sources and topics
/// daily_tech_article
///
/// # Custom config, commit and push the new article
/// daily_tech_article -c sources.yaml -a ./articles --commit --push
///
/// # See what would be picked without writing anything
/// daily_tech_article --dry-run
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory holding saved articles
    #[arg(short, long, env = "ARTICLE_ARCHIVE_DIR", default_value = "articles")]
    pub archive_dir: PathBuf,

    /// Optional path to a YAML config file
    #[arg(short, long, env = "ARTICLE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Append the offline placeholder catalog as a last-resort source
    #[arg(long)]
    pub local_fallback: bool,

    /// Print the selected article as JSON instead of saving it
    #[arg(long)]
    pub dry_run: bool,

    /// Commit the new article and index with git
    #[arg(long)]
    pub commit: bool,

    /// Push after committing (implies --commit)
    #[arg(long)]
    pub push: bool,
}
