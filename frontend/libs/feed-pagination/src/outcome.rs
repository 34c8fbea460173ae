//! Classified page fetch results

use thiserror::Error;

/// One page of items, plus optional view metadata (e.g. the profile summary
/// that arrives alongside a profile's posts)
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T, M = ()> {
    pub items: Vec<T>,
    pub meta: Option<M>,
}

impl<T, M> Page<T, M> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items, meta: None }
    }

    pub fn with_meta(items: Vec<T>, meta: M) -> Self {
        Self {
            items,
            meta: Some(meta),
        }
    }
}

/// Why a fetch ended in the refresh-required state
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// The request never produced a response
    #[error("Network fault: {0}")]
    Network(String),

    /// The request could not be built, nothing was sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Non-OK status that matched no known marker
    #[error("Server error {status}: {body}")]
    Server { status: u16, body: String },

    /// OK status but the body could not be decoded
    #[error("Malformed response: {0}")]
    Decode(String),
}

/// Outcome of a single page fetch
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T, M = ()> {
    Success(Page<T, M>),
    /// Server reported there are no items for this cursor
    Exhausted,
    /// The resource the feed belongs to does not exist
    NotFound,
    /// Session missing or expired
    Unauthenticated,
    Error(FetchFailure),
}

impl<T, M> FetchOutcome<T, M> {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::Exhausted => "exhausted",
            Self::NotFound => "not_found",
            Self::Unauthenticated => "unauthenticated",
            Self::Error(_) => "error",
        }
    }
}
