//! # Daily Tech Article
//!
//! Runs one acquisition: loads the archive snapshot, walks the configured
//! sources in priority order and saves the first on-topic, not yet archived
//! article as Markdown, appends it to `INDEX.md` and optionally commits it.
//!
//! ## Usage
//!
//! ```sh
//! daily_tech_article -a ./articles --commit
//! ```
//!
//! Scheduling is left to cron or a CI timer; one invocation is one run.

use chrono::Local;
use clap::Parser;
use daily_tech_article::api::build_client;
use daily_tech_article::cli::Cli;
use daily_tech_article::config::Config;
use daily_tech_article::outputs::{self, git};
use daily_tech_article::sources::{self, FetchArticles};
use daily_tech_article::utils::{ensure_writable_dir, truncate_for_log};
use daily_tech_article::{ArchiveIndex, Orchestrator, RunResult};
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("daily_tech_article starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // ---- Configuration (fatal on setup mistakes) ----
    let mut config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };
    config.local_fallback |= args.local_fallback;

    if !args.dry_run {
        if let Err(e) = ensure_writable_dir(&args.archive_dir).await {
            error!(
                path = %args.archive_dir.display(),
                error = %e,
                "Archive directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    // ---- Archive snapshot, sources, orchestrator ----
    let archive = if args.dry_run {
        ArchiveIndex::load_read_only(&args.archive_dir).await?
    } else {
        ArchiveIndex::load(&args.archive_dir).await?
    };
    let client = build_client(&config.user_agent, config.request_timeout())?;
    let chain = sources::from_config(&config, &client);
    info!(
        order = ?chain.iter().map(|s| s.name()).collect::<Vec<_>>(),
        "Source priority"
    );

    let orchestrator = match Orchestrator::new(chain, &config.topics, archive) {
        Ok(o) => o.with_fetch_timeout(config.fetch_timeout()),
        Err(e) => {
            error!(error = %e, "Cannot start run");
            return Err(e.into());
        }
    };

    let outcome = match orchestrator.run().await {
        RunResult::Exhausted => {
            info!("No new article this run");
            "exhausted"
        }
        RunResult::Accepted(article) => {
            info!(
                id = %article.external_id,
                title = %article.title,
                body = %truncate_for_log(&article.body_text, 120),
                "Selected article"
            );
            if args.dry_run {
                println!("{}", serde_json::to_string_pretty(&article)?);
            } else {
                persist(&args, &article).await?;
            }
            "accepted"
        }
    };

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        outcome,
        "Execution complete"
    );
    Ok(())
}

/// Write the article file, update the index and commit if asked to.
#[instrument(level = "info", skip_all, fields(id = %article.external_id))]
async fn persist(
    args: &Cli,
    article: &daily_tech_article::CandidateArticle,
) -> Result<(), Box<dyn Error>> {
    let date = Local::now().date_naive();
    let saved = outputs::save_article(&args.archive_dir, date, article).await?;

    if args.commit || args.push {
        let message = format!("Add article for {date}");
        if let Err(e) = git::commit_paths(&args.archive_dir, &saved.commit_paths(), &message, args.push).await {
            error!(error = %e, "Failed to commit archive");
            return Err(e);
        }
    }
    Ok(())
}
