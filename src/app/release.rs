//! Release resolution against the template feed
//!
//! Queries the "latest release" endpoint of the configured template
//! repository and selects the asset matching the requested assistant
//! profile and script dialect.

use std::env;

use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::TemplateRepo;
use crate::constants::{env as env_vars, files, http};
use crate::errors::{FetchError, FetchResult};

/// Release metadata from the template feed
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// A downloadable asset attached to a release
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
    pub size: u64,
}

/// Resolve the auth token for the release feed.
///
/// Precedence: explicit value, then `GH_TOKEN`, then `GITHUB_TOKEN`.
/// Whitespace-only values count as absent.
pub fn resolve_github_token(explicit: Option<&str>) -> Option<String> {
    explicit
        .map(str::to_string)
        .filter(|token| !token.is_empty())
        .or_else(|| env::var(env_vars::GH_TOKEN).ok().filter(|t| !t.is_empty()))
        .or_else(|| {
            env::var(env_vars::GITHUB_TOKEN)
                .ok()
                .filter(|t| !t.is_empty())
        })
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Asset-name pattern for an assistant/dialect pair
pub fn asset_pattern(assistant: &str, dialect: &str) -> String {
    format!("{}-{}-{}", files::ASSET_PREFIX, assistant, dialect)
}

/// Select the template asset matching `pattern`.
///
/// Matching assets must contain the pattern and carry the archive
/// suffix. The first match in listed order wins; when several assets
/// match there is no better tie-break than feed order, which is
/// deterministic for a fixed response but otherwise arbitrary.
pub fn select_template_asset<'a>(
    assets: &'a [ReleaseAsset],
    pattern: &str,
) -> Option<&'a ReleaseAsset> {
    assets
        .iter()
        .find(|asset| asset.name.contains(pattern) && asset.name.ends_with(files::ARCHIVE_SUFFIX))
}

/// Fetch the latest release and pick the asset for the requested
/// assistant and dialect.
///
/// `api_base` is the feed root, normally `constants::github::API_BASE_URL`.
///
/// # Errors
///
/// Returns `FetchError` if the feed is unreachable, answers with a
/// non-success status, returns unparseable metadata, or lists no
/// matching asset.
pub async fn resolve_latest(
    client: &Client,
    api_base: &str,
    repo: &TemplateRepo,
    assistant: &str,
    dialect: &str,
    token: Option<&str>,
) -> FetchResult<(Release, ReleaseAsset)> {
    let url = latest_release_url(api_base, repo);
    debug!("Fetching latest release from {}", url);

    let mut request = client.get(&url).timeout(http::DEFAULT_TIMEOUT);
    if let Some(token) = token {
        request = request.header(AUTHORIZATION, format!("Bearer {}", token));
    }
    let response = request.send().await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
            url,
            body: truncate(&body, http::BODY_SNIPPET_LEN),
        });
    }

    let release: Release = serde_json::from_str(&body).map_err(|source| FetchError::Parse {
        source,
        body: truncate(&body, http::BODY_SNIPPET_LEN),
    })?;

    let pattern = asset_pattern(assistant, dialect);
    let asset = select_template_asset(&release.assets, &pattern)
        .cloned()
        .ok_or_else(|| FetchError::NoMatchingAsset {
            pattern,
            available: release.assets.iter().map(|a| a.name.clone()).collect(),
        })?;

    debug!(
        "Selected asset {} ({} bytes) from release {}",
        asset.name, asset.size, release.tag_name
    );
    Ok((release, asset))
}

/// The "latest release" endpoint for a repository
pub fn latest_release_url(api_base: &str, repo: &TemplateRepo) -> String {
    format!(
        "{}/repos/{}/{}/releases/latest",
        api_base, repo.owner, repo.name
    )
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

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(name: &str) -> ReleaseAsset {
        ReleaseAsset {
            name: name.to_string(),
            browser_download_url: format!("https://example.com/{}", name),
            size: 1024,
        }
    }

    #[test]
    fn test_asset_pattern() {
        assert_eq!(asset_pattern("claude", "sh"), "template-claude-sh");
    }

    #[test]
    fn test_selection_first_match_wins() {
        let assets = vec![
            asset("unrelated.zip"),
            asset("template-claude-sh-v1.zip"),
            asset("template-claude-sh-v2.zip"),
        ];
        let selected = select_template_asset(&assets, "template-claude-sh").unwrap();
        assert_eq!(selected.name, "template-claude-sh-v1.zip");

        // Deterministic: selecting twice from the same list yields the same asset
        let again = select_template_asset(&assets, "template-claude-sh").unwrap();
        assert_eq!(again.name, selected.name);
    }

    #[test]
    fn test_selection_requires_archive_suffix() {
        let assets = vec![asset("template-claude-sh.tar.gz")];
        assert!(select_template_asset(&assets, "template-claude-sh").is_none());
    }

    #[test]
    fn test_selection_no_match() {
        let assets = vec![asset("template-gemini-ps.zip")];
        assert!(select_template_asset(&assets, "template-claude-sh").is_none());
    }

    #[test]
    fn test_explicit_token_preferred_and_trimmed() {
        assert_eq!(
            resolve_github_token(Some("  tok  ")),
            Some("tok".to_string())
        );
        assert_eq!(resolve_github_token(Some("   ")), None);
    }

    #[test]
    fn test_latest_release_url() {
        let repo = TemplateRepo {
            owner: "acme".to_string(),
            name: "kits".to_string(),
        };
        assert_eq!(
            latest_release_url("https://api.github.com", &repo),
            "https://api.github.com/repos/acme/kits/releases/latest"
        );
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let body = "héllo wörld";
        let snippet = truncate(body, 2);
        assert!(snippet.len() <= 2);
        assert!(body.starts_with(&snippet));
    }

    #[test]
    fn test_release_parses_without_assets() {
        let release: Release = serde_json::from_str(r#"{"tag_name": "v1.0"}"#).unwrap();
        assert_eq!(release.tag_name, "v1.0");
        assert!(release.assets.is_empty());
    }
}
