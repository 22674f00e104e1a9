//! Core application logic for Stencil
//!
//! This module contains the scaffolding pipeline and its collaborators:
//! the HTTP client configuration, release resolution, archive download,
//! extraction/merging, script permission normalization and the
//! version-control bootstrap.

pub mod client;
pub mod extract;
pub mod fetch;
pub mod permissions;
pub mod pipeline;
pub mod release;
pub mod report;
pub mod vcs;

// Re-export main public API
pub use client::ClientConfig;
pub use extract::{extract_template, ProjectTarget};
pub use fetch::{download_asset, DownloadedArchive};
pub use permissions::{ensure_executable_scripts, NormalizeOutcome};
pub use pipeline::{run_pipeline, PipelineOptions, PipelineReport};
pub use release::{
    asset_pattern, resolve_github_token, resolve_latest, select_template_asset, Release,
    ReleaseAsset,
};
pub use report::{NullReporter, Reporter};
pub use vcs::{init_git_repo, is_git_repo};
