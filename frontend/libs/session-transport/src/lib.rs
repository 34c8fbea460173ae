//! Session transport
//!
//! Wraps every outbound API call with the browser-style session contract:
//! - cookies from a shared jar are sent (and `Set-Cookie` responses stored)
//! - the anti-forgery token is read from the jar and echoed as a header
//! - bodies are serialized as JSON
//!
//! Responses come back raw. Interpreting status codes (exhausted page,
//! redirect-to-login, ...) is the caller's job.

pub mod config;
pub mod csrf;
pub mod error;

pub use config::TransportConfig;
pub use error::{Result, TransportError};
pub use reqwest::cookie::Jar;
pub use reqwest::{Method, StatusCode};

use std::sync::Arc;

use bytes::Bytes;
use reqwest::cookie::CookieStore;
use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE, LOCATION};
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

/// A response as the transport received it
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    /// Server answered with a redirect (or one was followed)
    pub redirected: bool,
    /// `Location` header of a redirect response
    pub location: Option<String>,
    pub body: Bytes,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(TransportError::Decode)
    }

    /// Body as lossy UTF-8, for diagnostics
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Credentialed HTTP transport
///
/// Cloning is cheap; clones share the HTTP connection pool and cookie jar.
#[derive(Clone)]
pub struct SessionTransport {
    client: reqwest::Client,
    jar: Arc<Jar>,
    csrf_header: HeaderName,
    config: Arc<TransportConfig>,
}

impl SessionTransport {
    /// Create a transport with a fresh, empty cookie jar
    pub fn new(config: TransportConfig) -> Result<Self> {
        Self::with_jar(config, Arc::new(Jar::default()))
    }

    /// Create a transport around an existing cookie jar
    pub fn with_jar(config: TransportConfig, jar: Arc<Jar>) -> Result<Self> {
        let csrf_header = HeaderName::from_bytes(config.csrf_header_name.as_bytes())
            .map_err(|_| TransportError::InvalidHeader(config.csrf_header_name.clone()))?;

        let redirect = if config.follow_redirects {
            Policy::default()
        } else {
            Policy::none()
        };

        let client = reqwest::Client::builder()
            .cookie_provider(jar.clone())
            .redirect(redirect)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            jar,
            csrf_header,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Shared cookie jar
    pub fn jar(&self) -> Arc<Jar> {
        self.jar.clone()
    }

    /// Resolve an API path against the backend origin
    pub fn resolve(&self, path: &str) -> Result<Url> {
        self.config.resolve(path)
    }

    /// Current anti-forgery token for the backend origin, if the jar holds one
    pub fn csrf_token(&self) -> Option<String> {
        self.csrf_token_for(&self.config.base_url)
    }

    fn csrf_token_for(&self, url: &Url) -> Option<String> {
        let header = self.jar.cookies(url)?;
        let header = header.to_str().ok()?;
        csrf::find_cookie(header, &self.config.csrf_cookie_name)
    }

    /// Send a request and return the raw response
    ///
    /// Network faults (connect, timeout) are errors; every HTTP status,
    /// including 3xx/4xx/5xx, is a successful `RawResponse`.
    pub async fn request<B>(&self, method: Method, url: &Url, body: Option<&B>) -> Result<RawResponse>
    where
        B: Serialize + ?Sized,
    {
        let mut builder = self
            .client
            .request(method.clone(), url.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        match self.csrf_token_for(url) {
            Some(token) => {
                let value = HeaderValue::from_str(&token)
                    .map_err(|_| TransportError::InvalidHeader(self.config.csrf_cookie_name.clone()))?;
                builder = builder.header(self.csrf_header.clone(), value);
            }
            None => debug!(url = %url, "No anti-forgery cookie present"),
        }

        if let Some(body) = body {
            let encoded = serde_json::to_vec(body).map_err(TransportError::Encode)?;
            builder = builder.body(encoded);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(method = %method, url = %url, error = %e, "Request failed before a response arrived");
            TransportError::Request(e)
        })?;

        let status = response.status();
        let redirected = status.is_redirection() || response.url() != url;
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;

        debug!(
            method = %method,
            url = %url,
            status = status.as_u16(),
            redirected,
            "Response received"
        );

        Ok(RawResponse {
            status,
            redirected,
            location,
            body,
        })
    }

    pub async fn get(&self, url: &Url) -> Result<RawResponse> {
        self.request::<()>(Method::GET, url, None).await
    }

    pub async fn post_json<B>(&self, url: &Url, body: &B) -> Result<RawResponse>
    where
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, url, Some(body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csrf_token_read_from_jar() {
        let config = TransportConfig::new("http://localhost:8000").unwrap();
        let jar = Arc::new(Jar::default());
        jar.add_cookie_str("csrftoken=tok123; Path=/", &config.base_url);

        let transport = SessionTransport::with_jar(config, jar).unwrap();
        assert_eq!(transport.csrf_token(), Some("tok123".to_string()));
    }

    #[test]
    fn test_csrf_token_absent_with_empty_jar() {
        let config = TransportConfig::new("http://localhost:8000").unwrap();
        let transport = SessionTransport::new(config).unwrap();
        assert_eq!(transport.csrf_token(), None);
    }

    #[test]
    fn test_invalid_csrf_header_name_rejected() {
        let mut config = TransportConfig::new("http://localhost:8000").unwrap();
        config.csrf_header_name = "bad header".to_string();
        assert!(matches!(
            SessionTransport::new(config),
            Err(TransportError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_raw_response_json_and_text() {
        let response = RawResponse {
            status: StatusCode::NOT_FOUND,
            redirected: false,
            location: None,
            body: Bytes::from_static(br#"{"error":"emptyPage"}"#),
        };
        assert!(!response.is_success());
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["error"], "emptyPage");
        assert_eq!(response.text(), r#"{"error":"emptyPage"}"#);
    }
}
