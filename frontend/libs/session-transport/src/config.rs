//! Transport configuration
//!
//! Backend origin, CSRF cookie/header names and HTTP client knobs.
//! Loaded from environment variables with development defaults.

use std::env;
use std::time::Duration;

use url::Url;

use crate::error::{Result, TransportError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_CSRF_COOKIE: &str = "csrftoken";
pub const DEFAULT_CSRF_HEADER: &str = "x-csrftoken";

#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Backend origin every API path and media reference is resolved against
    pub base_url: Url,

    /// Cookie the anti-forgery token is read from
    pub csrf_cookie_name: String,

    /// Header the anti-forgery token is echoed in
    pub csrf_header_name: String,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Follow 3xx responses instead of returning them raw
    pub follow_redirects: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            csrf_cookie_name: DEFAULT_CSRF_COOKIE.to_string(),
            csrf_header_name: DEFAULT_CSRF_HEADER.to_string(),
            request_timeout: Duration::from_secs(30),
            follow_redirects: false,
        }
    }
}

impl TransportConfig {
    /// Create a configuration for the given backend origin with default
    /// cookie/header names
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            ..Default::default()
        })
    }

    /// Load configuration from environment variables
    /// Falls back to defaults for development
    pub fn from_env() -> Result<Self> {
        let base_url = match env::var("API_BASE_URL") {
            Ok(raw) => Url::parse(&raw)?,
            Err(_) => default_base_url(),
        };

        let csrf_header_name =
            env::var("CSRF_HEADER_NAME").unwrap_or_else(|_| DEFAULT_CSRF_HEADER.to_string());
        if reqwest::header::HeaderName::from_bytes(csrf_header_name.as_bytes()).is_err() {
            return Err(TransportError::InvalidHeader(csrf_header_name));
        }

        Ok(Self {
            base_url,
            csrf_cookie_name: env::var("CSRF_COOKIE_NAME")
                .unwrap_or_else(|_| DEFAULT_CSRF_COOKIE.to_string()),
            csrf_header_name,
            request_timeout: Duration::from_secs(
                env::var("HTTP_REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            follow_redirects: env::var("HTTP_FOLLOW_REDIRECTS")
                .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE"))
                .unwrap_or(false),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    /// Resolve a path (or an absolute URL) against the backend origin
    pub fn resolve(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).unwrap_or_else(|_| unreachable!("default base url is valid"))
}
