//! Page sources backed by the session transport

use async_trait::async_trait;
use feed_pagination::{FetchFailure, FetchOutcome, PageSource};
use session_transport::SessionTransport;
use tracing::warn;

use crate::api::{self, Endpoints};
use crate::models::{Post, UserProfile};

/// Which feed a view shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedKind {
    Timeline,
    Profile { username: String },
}

impl FeedKind {
    pub fn label(&self) -> String {
        match self {
            Self::Timeline => "timeline".to_string(),
            Self::Profile { username } => format!("profile:{}", username),
        }
    }
}

/// Fetches feed pages for one [`FeedKind`]
///
/// The timeline endpoint takes no cursor; every call returns the server's
/// current batch.
pub struct FeedSource {
    kind: FeedKind,
    transport: SessionTransport,
    endpoints: Endpoints,
}

impl FeedSource {
    pub fn new(kind: FeedKind, transport: SessionTransport, endpoints: Endpoints) -> Self {
        Self {
            kind,
            transport,
            endpoints,
        }
    }

    pub fn kind(&self) -> &FeedKind {
        &self.kind
    }
}

#[async_trait]
impl PageSource for FeedSource {
    type Item = Post;
    type Meta = UserProfile;

    async fn fetch_page(&self, cursor: u32) -> FetchOutcome<Post, UserProfile> {
        let url = match &self.kind {
            FeedKind::Timeline => self.endpoints.timeline(),
            FeedKind::Profile { username } => self.endpoints.profile(username, cursor),
        };
        let url = match url {
            Ok(url) => url,
            Err(e) => {
                warn!(feed = %self.kind.label(), cursor, error = %e, "Feed URL could not be built");
                return FetchOutcome::Error(FetchFailure::InvalidRequest(e.to_string()));
            }
        };

        match self.transport.get(&url).await {
            Ok(response) => match self.kind {
                FeedKind::Timeline => api::classify_timeline(&response),
                FeedKind::Profile { .. } => api::classify_profile_page(&response),
            },
            Err(e) => {
                warn!(feed = %self.kind.label(), cursor, error = %e, "Feed request failed");
                api::network_fault(&e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use session_transport::TransportConfig;
    use url::Url;

    #[tokio::test]
    async fn test_unbuildable_url_is_not_a_network_fault() {
        // Nothing can be joined onto a cannot-be-a-base URL
        let endpoints = Endpoints::new(Url::parse("mailto:feeds@example.com").unwrap());
        let transport = SessionTransport::new(TransportConfig::default()).unwrap();

        for kind in [
            FeedKind::Timeline,
            FeedKind::Profile {
                username: "alice".to_string(),
            },
        ] {
            let source = FeedSource::new(kind, transport.clone(), endpoints.clone());
            let outcome = source.fetch_page(1).await;
            assert!(matches!(
                outcome,
                FetchOutcome::Error(FetchFailure::InvalidRequest(_))
            ));
        }
    }
}
