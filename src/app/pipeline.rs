//! The scaffolding pipeline
//!
//! Resolve → fetch → extract → permission normalization, strictly
//! sequential, every step reporting into the supplied [`Reporter`].
//! The first fatal error aborts the run with the current step marked
//! errored; fresh-directory rollback is owned by the extractor. The
//! downloaded archive is deleted unconditionally once extraction has
//! been attempted.

use std::path::PathBuf;

use reqwest::Client;
use tracing::{info, warn};

use crate::app::extract::{extract_template, ProjectTarget};
use crate::app::fetch::download_asset;
use crate::app::permissions::ensure_executable_scripts;
use crate::app::release::resolve_latest;
use crate::app::report::Reporter;
use crate::config::TemplateRepo;
use crate::errors::Result;

/// Everything the pipeline needs besides the target itself
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Assistant profile key (e.g. "claude")
    pub assistant: String,
    /// Script dialect key ("sh" or "ps")
    pub dialect: String,
    /// Root URL of the release feed
    pub api_base: String,
    /// Repository the template release is resolved from
    pub repo: TemplateRepo,
    /// Optional bearer token for the release feed
    pub github_token: Option<String>,
    /// Where the archive is downloaded before extraction
    pub download_dir: PathBuf,
    /// Draw a byte-level progress bar (plain mode only; the live step
    /// tree reports the filename instead)
    pub show_progress: bool,
}

/// What a successful run produced, for the final summary
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub release_tag: String,
    pub archive_name: String,
}

/// Run the full scaffolding pipeline into `target`.
///
/// # Errors
///
/// Returns the first fatal error (fetch, download or extraction);
/// script-permission problems are reported on their own step but never
/// fail the run.
pub async fn run_pipeline(
    client: &Client,
    target: &ProjectTarget,
    options: &PipelineOptions,
    reporter: &dyn Reporter,
) -> Result<PipelineReport> {
    reporter.start("fetch", "contacting release feed");
    let (release, asset) = match resolve_latest(
        client,
        &options.api_base,
        &options.repo,
        &options.assistant,
        &options.dialect,
        options.github_token.as_deref(),
    )
    .await
    {
        Ok(found) => found,
        Err(e) => {
            reporter.error("fetch", &e.to_string());
            return Err(e.into());
        }
    };
    reporter.complete(
        "fetch",
        &format!("release {} ({} bytes)", release.tag_name, asset.size),
    );

    reporter.add("download", "Download template");
    reporter.start("download", &asset.name);
    let archive = match download_asset(
        client,
        &asset,
        &release.tag_name,
        &options.download_dir,
        options.github_token.as_deref(),
        options.show_progress,
    )
    .await
    {
        Ok(archive) => archive,
        Err(e) => {
            reporter.error("download", &e.to_string());
            return Err(e.into());
        }
    };
    reporter.complete("download", &archive.filename);

    let extract_result = extract_template(&archive.path, target, reporter);

    // The archive never outlives the extraction attempt, success or not
    reporter.add("cleanup", "Remove temporary archive");
    if archive.path.exists() {
        match std::fs::remove_file(&archive.path) {
            Ok(()) => reporter.complete("cleanup", ""),
            Err(e) => {
                warn!("Could not remove {}: {}", archive.path.display(), e);
                reporter.error("cleanup", &e.to_string());
            }
        }
    } else {
        reporter.complete("cleanup", "");
    }
    extract_result?;

    // Execute bits are best-effort: collected failures are reported in
    // aggregate, never fatal
    let outcome = ensure_executable_scripts(&target.path);
    reporter.add("chmod", "Set script permissions");
    if outcome.is_noop() {
        reporter.skip("chmod", "no scripts found");
    } else if outcome.failures.is_empty() {
        reporter.complete("chmod", &outcome.summary());
    } else {
        for failure in &outcome.failures {
            warn!(
                "Could not set execute bits on {}: {}",
                failure.path.display(),
                failure.error
            );
        }
        reporter.error("chmod", &outcome.summary());
    }

    info!(
        "Template {} ({}) extracted into {}",
        archive.filename,
        archive.release_tag,
        target.path.display()
    );
    Ok(PipelineReport {
        release_tag: archive.release_tag,
        archive_name: archive.filename,
    })
}
