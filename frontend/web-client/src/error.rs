//! Client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] session_transport::TransportError),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("URL cannot be used as an API base: {0}")]
    InvalidBaseUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The server answered with a redirect or 401 where a session was required
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Unexpected response {status}: {body}")]
    UnexpectedResponse { status: u16, body: String },
}

pub type Result<T> = std::result::Result<T, ClientError>;
