//! Committing the archive with the `git` command-line tool.

use std::error::Error;
use std::path::Path;
use tokio::process::Command;
use tracing::{info, instrument};

async fn git(repo_dir: &Path, args: &[&str]) -> Result<(), Box<dyn Error>> {
    let output = Command::new("git")
        .arg("-C")
        .arg(repo_dir)
        .args(args)
        .output()
        .await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("git {} failed ({}): {}", args.join(" "), output.status, stderr.trim()).into());
    }
    Ok(())
}

/// Stage `paths`, commit them with `message` and optionally push.
#[instrument(level = "info", skip_all, fields(repo_dir = %repo_dir.display(), %message, push = push))]
pub async fn commit_paths(
    repo_dir: &Path,
    paths: &[&Path],
    message: &str,
    push: bool,
) -> Result<(), Box<dyn Error>> {
    let mut add: Vec<&str> = vec!["add", "--"];
    for p in paths {
        add.push(p.to_str().ok_or("non UTF-8 path")?);
    }
    git(repo_dir, &add).await?;
    git(repo_dir, &["commit", "-m", message]).await?;
    info!("Committed archive update");

    if push {
        git(repo_dir, &["push"]).await?;
        info!("Pushed archive update");
    }
    Ok(())
}
