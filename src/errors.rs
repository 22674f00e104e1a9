//! Error types for Stencil
//!
//! This module defines error types for all components of the application.
//! Errors are designed to be actionable: fatal pipeline errors carry the
//! server status and a truncated response body for diagnostics, while
//! soft errors (script permissions, git bootstrap) are collected and
//! reported without aborting the run.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving a release from the template feed
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP transport failure reaching the release feed
    #[error("HTTP request to release feed failed")]
    Http(#[from] reqwest::Error),

    /// Release feed answered with a non-success status
    #[error("release feed returned HTTP {status} for {url}")]
    Status {
        status: u16,
        url: String,
        /// Truncated response body, surfaced in debug output
        body: String,
    },

    /// Release metadata did not parse as expected
    #[error("failed to parse release metadata")]
    Parse {
        source: serde_json::Error,
        /// Truncated raw body, surfaced in debug output
        body: String,
    },

    /// No release asset matched the template naming pattern
    #[error("no release asset matches pattern '{pattern}'")]
    NoMatchingAsset {
        pattern: String,
        /// Every asset name the release listed, for diagnostics
        available: Vec<String>,
    },
}

/// Errors raised while streaming the template archive to disk
#[derive(Error, Debug)]
pub enum DownloadError {
    /// HTTP transport failure during the download
    #[error("HTTP request for archive failed")]
    Http(#[from] reqwest::Error),

    /// Asset URL did not parse
    #[error("invalid download URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },

    /// Server answered the download request with a non-success status
    #[error("archive download returned HTTP {status}")]
    Status {
        status: u16,
        /// Truncated response body, surfaced in debug output
        body: String,
    },

    /// I/O failure writing the archive to disk
    #[error("file I/O error during download")]
    Io(#[from] std::io::Error),
}

/// Errors raised while unpacking or merging the template archive
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Destination for a fresh project already exists
    #[error("destination directory already exists: {}", .path.display())]
    DestinationExists { path: PathBuf },

    /// Archive is corrupt or not a valid zip
    #[error("failed to read template archive")]
    Archive(#[from] zip::result::ZipError),

    /// Filesystem operation failed during unpack, flatten or merge
    #[error("file I/O error during extraction")]
    Io(#[from] std::io::Error),
}

/// Errors raised while bootstrapping a version-control repository.
///
/// These are soft failures: they are reported on their own step but
/// never abort the pipeline or roll back the extraction.
#[derive(Error, Debug)]
pub enum VcsError {
    /// A git invocation exited unsuccessfully
    #[error("git {action} failed: {stderr}")]
    CommandFailed {
        action: &'static str,
        stderr: String,
    },

    /// Spawning git failed (binary missing or not executable)
    #[error("failed to run git")]
    Io(#[from] std::io::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error reading the configuration file
    #[error("failed to read configuration file: {}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid configuration format
    #[error("invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// Repository override was not of the form "owner/name"
    #[error("repository must be in 'owner/name' format, got: {value}")]
    InvalidRepo { value: String },
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Release resolution error
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Archive download error
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Extraction or merge error
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// Version-control bootstrap error
    #[error(transparent)]
    Vcs(#[from] VcsError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The user cancelled an interactive prompt
    #[error("operation cancelled")]
    Cancelled,

    /// Generic application error with context
    #[error("{message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Whether this error aborts the pipeline and (in fresh-directory
    /// mode) rolls back the destination
    pub fn is_fatal(&self) -> bool {
        !matches!(self, AppError::Vcs(_))
    }

    /// Error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Fetch(_) => "fetch",
            AppError::Download(_) => "download",
            AppError::Extract(_) => "extract",
            AppError::Vcs(_) => "vcs",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Cancelled => "cancelled",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Fetch result type alias
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Download result type alias
pub type DownloadResult<T> = std::result::Result<T, DownloadError>;

/// Extraction result type alias
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_matching_asset_lists_names() {
        let err = FetchError::NoMatchingAsset {
            pattern: "template-claude-sh".to_string(),
            available: vec!["other.zip".to_string()],
        };
        assert!(err.to_string().contains("template-claude-sh"));
    }

    #[test]
    fn test_fatality_classification() {
        let vcs = AppError::Vcs(VcsError::CommandFailed {
            action: "init",
            stderr: "boom".to_string(),
        });
        assert!(!vcs.is_fatal());

        let fetch = AppError::Fetch(FetchError::Status {
            status: 500,
            url: "https://example.com".to_string(),
            body: String::new(),
        });
        assert!(fetch.is_fatal());
        assert_eq!(fetch.category(), "fetch");
    }
}
