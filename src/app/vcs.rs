//! Version-control bootstrap
//!
//! Detects an existing git repository and, when absent, initializes one
//! with a single commit containing the extracted tree. Failures here
//! are soft: reported on the git step, never rolling back extraction.

use std::path::Path;

use tokio::process::Command;
use tracing::debug;

use crate::errors::VcsError;

/// Whether `path` lies inside a git work tree.
///
/// Also false when git itself is unavailable; callers probe for the
/// tool separately to distinguish the two.
pub async fn is_git_repo(path: &Path) -> bool {
    if !path.is_dir() {
        return false;
    }
    Command::new("git")
        .args(["rev-parse", "--is-inside-work-tree"])
        .current_dir(path)
        .output()
        .await
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Initialize a repository at `path` and record one commit with the
/// extracted tree.
///
/// # Errors
///
/// Returns `VcsError` if any git invocation fails; the destination is
/// left as-is.
pub async fn init_git_repo(path: &Path) -> std::result::Result<(), VcsError> {
    run_git(path, "init", &["init"]).await?;
    run_git(path, "add", &["add", "."]).await?;
    run_git(
        path,
        "commit",
        &["commit", "-m", "Initial commit from Stencil template"],
    )
    .await?;
    debug!("Initialized git repository at {}", path.display());
    Ok(())
}

async fn run_git(
    path: &Path,
    action: &'static str,
    args: &[&str],
) -> std::result::Result<(), VcsError> {
    let output = Command::new("git")
        .args(args)
        .current_dir(path)
        .output()
        .await?;
    if output.status.success() {
        Ok(())
    } else {
        Err(VcsError::CommandFailed {
            action,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}
