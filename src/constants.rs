//! Application constants for Stencil
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain for maintainability and clarity.

use std::time::Duration;

/// Environment variable names
pub mod env {
    /// Combined "owner/name" override for the template repository
    pub const TEMPLATE_REPO: &str = "STENCIL_REPO";

    /// Individual owner override for the template repository
    pub const TEMPLATE_REPO_OWNER: &str = "STENCIL_REPO_OWNER";

    /// Individual name override for the template repository
    pub const TEMPLATE_REPO_NAME: &str = "STENCIL_REPO_NAME";

    /// Primary environment variable for the release-feed auth token
    pub const GH_TOKEN: &str = "GH_TOKEN";

    /// Fallback environment variable for the release-feed auth token
    pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
}

/// Release feed endpoints and defaults
pub mod github {
    /// Base URL of the release feed API
    pub const API_BASE_URL: &str = "https://api.github.com";

    /// Default owner of the template repository
    pub const DEFAULT_REPO_OWNER: &str = "stencil-dev";

    /// Default name of the template repository
    pub const DEFAULT_REPO_NAME: &str = "stencil-templates";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = "Stencil/0.1.0 (Project Scaffolding Tool)";

    /// Timeout for release metadata requests
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Timeout for archive downloads
    pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

    /// Maximum number of redirects to follow
    pub const MAX_REDIRECTS: usize = 10;

    /// Maximum response-body length included in error details
    pub const BODY_SNIPPET_LEN: usize = 500;
}

/// File and archive handling constants
pub mod files {
    /// Expected suffix of downloadable template archives
    pub const ARCHIVE_SUFFIX: &str = ".zip";

    /// Leading component of template asset names
    pub const ASSET_PREFIX: &str = "template";

    /// Directories searched for shell scripts after extraction
    pub const SCRIPT_DIRS: &[&str] = &["scripts", ".stencil/scripts"];

    /// Extension of scripts that receive execute permissions
    pub const SCRIPT_EXTENSION: &str = "sh";
}

/// Assistant profiles and script dialects
pub mod assistants {
    /// Known assistant keys and their display names
    pub const CATALOG: &[(&str, &str)] = &[
        ("copilot", "GitHub Copilot"),
        ("claude", "Claude Code"),
        ("gemini", "Gemini CLI"),
        ("cursor", "Cursor"),
        ("qwen", "Qwen Code"),
        ("opencode", "opencode"),
        ("codex", "Codex CLI"),
        ("windsurf", "Windsurf"),
        ("kilocode", "Kilo Code"),
        ("auggie", "Auggie CLI"),
        ("roo", "Roo Code"),
    ];

    /// Default assistant key when none is chosen interactively
    pub const DEFAULT_ASSISTANT: &str = "copilot";

    /// Script dialect keys and their display names
    pub const SCRIPT_DIALECTS: &[(&str, &str)] = &[
        ("sh", "POSIX Shell (bash/zsh)"),
        ("ps", "PowerShell"),
    ];

    /// Assistant keys whose CLI tool is probed before scaffolding,
    /// paired with an install hint
    pub const TOOL_CHECKS: &[(&str, &str)] = &[
        ("claude", "https://docs.anthropic.com/en/docs/claude-code/setup"),
        ("gemini", "https://github.com/google-gemini/gemini-cli"),
        ("qwen", "https://github.com/QwenLM/qwen-code"),
        ("opencode", "https://opencode.ai"),
        ("codex", "https://github.com/openai/codex"),
        ("auggie", "https://docs.augmentcode.com/cli/setup-auggie/install-auggie-cli"),
    ];

    /// Per-assistant folder that may hold credentials, shown in the
    /// post-init security notice
    pub const AGENT_FOLDERS: &[(&str, &str)] = &[
        ("claude", ".claude/"),
        ("gemini", ".gemini/"),
        ("cursor", ".cursor/"),
        ("qwen", ".qwen/"),
        ("opencode", ".opencode/"),
        ("codex", ".codex/"),
        ("windsurf", ".windsurf/"),
        ("kilocode", ".kilocode/"),
        ("auggie", ".augment/"),
        ("copilot", ".github/"),
        ("roo", ".roo/"),
    ];
}

// Re-export commonly used constants for convenience
pub use files::{ARCHIVE_SUFFIX, ASSET_PREFIX};
pub use github::{DEFAULT_REPO_NAME, DEFAULT_REPO_OWNER};
pub use http::USER_AGENT;

/// Look up the display name of an assistant key
pub fn assistant_display_name(key: &str) -> Option<&'static str> {
    assistants::CATALOG
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, name)| *name)
}

/// Whether the given key names a known assistant
pub fn is_known_assistant(key: &str) -> bool {
    assistant_display_name(key).is_some()
}

/// Whether the given key names a known script dialect
pub fn is_known_dialect(key: &str) -> bool {
    assistants::SCRIPT_DIALECTS.iter().any(|(k, _)| *k == key)
}

/// Platform-default script dialect
pub fn default_dialect() -> &'static str {
    if cfg!(windows) {
        "ps"
    } else {
        "sh"
    }
}
