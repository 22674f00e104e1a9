//! Configuration management for Stencil
//!
//! Provides a small TOML-backed configuration with zero-config defaults.
//! Values are resolved in precedence order: command-line flags, then
//! environment variables, then the configuration file, then built-in
//! defaults.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{env as env_vars, github, http};
use crate::errors::ConfigError;

/// The repository a template release is resolved from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRepo {
    pub owner: String,
    pub name: String,
}

impl TemplateRepo {
    /// Parse an "owner/name" string
    pub fn parse(value: &str) -> std::result::Result<Self, ConfigError> {
        match value.split('/').collect::<Vec<_>>().as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            _ => Err(ConfigError::InvalidRepo {
                value: value.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for TemplateRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Application configuration for TOML serialization
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Template repository settings
    #[serde(default)]
    pub templates: TemplatesConfig,
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfigToml,
}

/// TOML-friendly template repository configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplatesConfig {
    /// Owner of the repository that publishes template releases
    pub repo_owner: String,
    /// Name of the repository that publishes template releases
    pub repo_name: String,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            repo_owner: github::DEFAULT_REPO_OWNER.to_string(),
            repo_name: github::DEFAULT_REPO_NAME.to_string(),
        }
    }
}

/// TOML-friendly HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfigToml {
    /// Timeout for release metadata requests, in seconds
    pub request_timeout_secs: u64,
    /// Timeout for archive downloads, in seconds
    pub download_timeout_secs: u64,
    /// Connection establishment timeout, in seconds
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfigToml {
    fn default() -> Self {
        Self {
            request_timeout_secs: http::DEFAULT_TIMEOUT.as_secs(),
            download_timeout_secs: http::DOWNLOAD_TIMEOUT.as_secs(),
            connect_timeout_secs: http::CONNECT_TIMEOUT.as_secs(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the given path, or the default location.
    ///
    /// A missing file yields defaults; a malformed file is an error.
    pub fn load(path: Option<&Path>) -> std::result::Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        if !path.is_file() {
            debug!("No configuration file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let config: AppConfig = toml::from_str(&raw)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Default configuration file location (platform config dir)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("stencil").join("config.toml"))
    }

    /// Resolve the template repository, honoring environment overrides.
    ///
    /// Precedence: explicit `owner/name` argument (from `--repo`), then
    /// the combined env var, then individual owner/name env vars layered
    /// over the configured defaults.
    pub fn template_repo(
        &self,
        explicit: Option<&str>,
    ) -> std::result::Result<TemplateRepo, ConfigError> {
        if let Some(value) = explicit {
            return TemplateRepo::parse(value);
        }
        if let Ok(value) = env::var(env_vars::TEMPLATE_REPO) {
            if !value.trim().is_empty() {
                return TemplateRepo::parse(value.trim());
            }
        }

        let owner = env::var(env_vars::TEMPLATE_REPO_OWNER)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.templates.repo_owner.clone());
        let name = env::var(env_vars::TEMPLATE_REPO_NAME)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.templates.repo_name.clone());
        Ok(TemplateRepo { owner, name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_repo_parse() {
        let repo = TemplateRepo::parse("acme/templates").unwrap();
        assert_eq!(repo.owner, "acme");
        assert_eq!(repo.name, "templates");
        assert_eq!(repo.to_string(), "acme/templates");

        assert!(TemplateRepo::parse("nonsense").is_err());
        assert!(TemplateRepo::parse("too/many/parts").is_err());
        assert!(TemplateRepo::parse("/missing-owner").is_err());
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.templates.repo_owner, github::DEFAULT_REPO_OWNER);
        assert_eq!(config.http.download_timeout_secs, 60);
    }

    #[test]
    fn test_explicit_repo_wins() {
        let config = AppConfig::default();
        let repo = config.template_repo(Some("custom/kit")).unwrap();
        assert_eq!(repo.owner, "custom");
        assert_eq!(repo.name, "kit");
    }

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.templates.repo_name, github::DEFAULT_REPO_NAME);
    }

    #[test]
    fn test_load_parses_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[templates]\nrepo_owner = \"acme\"\nrepo_name = \"kits\"\n",
        )
        .unwrap();
        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.templates.repo_owner, "acme");
        // Unspecified sections fall back to defaults
        assert_eq!(config.http.connect_timeout_secs, 15);
    }

    #[test]
    fn test_load_rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not valid [ toml").unwrap();
        assert!(AppConfig::load(Some(&path)).is_err());
    }
}
