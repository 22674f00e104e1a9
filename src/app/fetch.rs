//! Archive download with streaming writes and progress reporting
//!
//! Streams a release asset to disk in chunks so memory use stays
//! bounded regardless of archive size. Progress is proportional when
//! the server declares a content length and indeterminate otherwise.
//! A partially written file is removed before any error is surfaced.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use url::Url;

use crate::app::release::ReleaseAsset;
use crate::constants::http;
use crate::errors::{DownloadError, DownloadResult};

/// A template archive sitting on local disk, ready for extraction.
///
/// Transient: consumed once by the extractor, after which the local
/// file is deleted.
#[derive(Debug, Clone)]
pub struct DownloadedArchive {
    pub path: PathBuf,
    pub filename: String,
    pub size: u64,
    pub release_tag: String,
    pub asset_url: String,
}

/// Stream `asset` into `dest_dir`, returning the local archive handle.
///
/// When `show_progress` is set, a proportional bar (or a spinner if the
/// server declares no content length) is drawn; the live step tree
/// suppresses this and reports completion with the filename instead.
///
/// # Errors
///
/// Returns `DownloadError` if the request fails, the server answers a
/// non-success status, or writing to disk fails. Any partially written
/// file is removed first.
pub async fn download_asset(
    client: &Client,
    asset: &ReleaseAsset,
    release_tag: &str,
    dest_dir: &Path,
    token: Option<&str>,
    show_progress: bool,
) -> DownloadResult<DownloadedArchive> {
    let destination = dest_dir.join(&asset.name);

    let url = Url::parse(&asset.browser_download_url).map_err(|e| DownloadError::InvalidUrl {
        url: asset.browser_download_url.clone(),
        error: e.to_string(),
    })?;

    let mut request = client.get(url).timeout(http::DOWNLOAD_TIMEOUT);
    if let Some(token) = token {
        request = request.header(AUTHORIZATION, format!("Bearer {}", token));
    }
    let response = request.send().await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(DownloadError::Status {
            status: status.as_u16(),
            body: truncate(&body, http::BODY_SNIPPET_LEN),
        });
    }

    let declared_len = response.content_length();
    let progress = if show_progress {
        Some(build_progress_bar(declared_len))
    } else {
        None
    };

    let written = match write_body(response, &destination, progress.as_ref()).await {
        Ok(written) => written,
        Err(e) => {
            // Never leave a partial archive behind
            if destination.exists() {
                let _ = tokio::fs::remove_file(&destination).await;
            }
            if let Some(pb) = progress {
                pb.finish_and_clear();
            }
            return Err(e);
        }
    };

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    debug!(
        "Downloaded {} ({} bytes) to {}",
        asset.name,
        written,
        destination.display()
    );

    Ok(DownloadedArchive {
        path: destination,
        filename: asset.name.clone(),
        size: written,
        release_tag: release_tag.to_string(),
        asset_url: asset.browser_download_url.clone(),
    })
}

/// Stream the response body to `destination`, flushing before return
async fn write_body(
    response: reqwest::Response,
    destination: &Path,
    progress: Option<&ProgressBar>,
) -> DownloadResult<u64> {
    let mut file = File::create(destination).await?;
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
        if let Some(pb) = progress {
            pb.set_position(written);
        }
    }
    file.flush().await?;
    Ok(written)
}

fn build_progress_bar(declared_len: Option<u64>) -> ProgressBar {
    match declared_len {
        Some(len) => {
            let pb = ProgressBar::new(len);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} Downloading [{bar:40.cyan/blue}] {percent:>3}%")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("##-"),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} Downloading {bytes}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb
        }
    }
}

fn truncate(body: &str, limit: usize) -> String {
    if body.len() <= limit {
        body.to_string()
    } else {
        let mut end = limit;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body[..end].to_string()
    }
}
