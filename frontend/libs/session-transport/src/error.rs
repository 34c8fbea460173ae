//! Transport error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid header name or value: {0}")]
    InvalidHeader(String),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl TransportError {
    /// True when the request never produced a response (connect, timeout, IO)
    pub fn is_network_fault(&self) -> bool {
        matches!(self, Self::Request(_))
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
