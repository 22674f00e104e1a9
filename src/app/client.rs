//! HTTP client configuration and building logic
//!
//! Constructs the single `reqwest::Client` shared by the release
//! resolver and the archive fetcher. Redirect following is required
//! because release asset URLs redirect to a CDN host.

use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::Client;

use crate::config::AppConfig;
use crate::constants::http;
use crate::errors::{FetchError, FetchResult};

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Timeout applied to release metadata requests
    pub request_timeout: Duration,
    /// Timeout applied to archive downloads
    pub download_timeout: Duration,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
    /// Maximum number of redirects to follow
    pub max_redirects: usize,
    /// Skip TLS certificate verification (not recommended)
    pub accept_invalid_certs: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: http::DEFAULT_TIMEOUT,
            download_timeout: http::DOWNLOAD_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            max_redirects: http::MAX_REDIRECTS,
            accept_invalid_certs: false,
        }
    }
}

impl ClientConfig {
    /// Derive a client configuration from loaded application config
    pub fn from_app_config(config: &AppConfig, accept_invalid_certs: bool) -> Self {
        Self {
            request_timeout: Duration::from_secs(config.http.request_timeout_secs),
            download_timeout: Duration::from_secs(config.http.download_timeout_secs),
            connect_timeout: Duration::from_secs(config.http.connect_timeout_secs),
            max_redirects: http::MAX_REDIRECTS,
            accept_invalid_certs,
        }
    }

    /// Builds the HTTP client with the specified configuration.
    ///
    /// The per-request timeout is left to callers (resolve vs download
    /// use different bounds); only the connect timeout is global here.
    pub fn build_http_client(&self) -> FetchResult<Client> {
        Client::builder()
            .user_agent(http::USER_AGENT)
            .connect_timeout(self.connect_timeout)
            .redirect(Policy::limited(self.max_redirects))
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .build()
            .map_err(FetchError::Http)
    }
}
