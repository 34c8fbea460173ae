//! Backend endpoints and response classification
//!
//! Turns raw transport responses into [`FetchOutcome`]s:
//! - redirect / 401: unauthenticated
//! - profile 404 `{"error":"emptyPage"}`: exhausted
//! - profile 404 `{"detail":"Not found."}`: unknown user
//! - timeline non-OK: unauthenticated
//! - anything else non-OK: refresh required

use feed_pagination::{FetchFailure, FetchOutcome, Page};
use session_transport::{RawResponse, StatusCode, TransportConfig, TransportError};
use url::Url;

use crate::error::{ClientError, Result};
use crate::models::{ApiErrorBody, Post, ProfilePage, UserProfile};

/// Terminal pagination marker in a profile 404 body
pub const EMPTY_PAGE_MARKER: &str = "emptyPage";

/// Unknown-user marker in a profile 404 body
pub const NOT_FOUND_DETAIL: &str = "Not found.";

/// API endpoints resolved against the backend origin
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    pub fn from_config(config: &TransportConfig) -> Self {
        Self::new(config.base_url.clone())
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn login(&self) -> Result<Url> {
        Ok(self.base.join("/users/login/")?)
    }

    pub fn logout(&self) -> Result<Url> {
        Ok(self.base.join("/users/logout/")?)
    }

    pub fn dashboard(&self) -> Result<Url> {
        Ok(self.base.join("/users/dashboard/")?)
    }

    pub fn timeline(&self) -> Result<Url> {
        Ok(self.base.join("/users/timeline/")?)
    }

    /// `/users/<username>/?page=<n>`, username percent-encoded as one segment
    pub fn profile(&self, username: &str, page: u32) -> Result<Url> {
        let mut url = self.base.join("/users/")?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .push(username)
            .push("");
        url.query_pairs_mut().append_pair("page", &page.to_string());
        Ok(url)
    }
}

/// True for the redirect-to-login family of responses
pub fn is_unauthenticated(response: &RawResponse) -> bool {
    response.redirected
        || response.status.is_redirection()
        || response.status == StatusCode::UNAUTHORIZED
}

fn error_body(response: &RawResponse) -> ApiErrorBody {
    response.json::<ApiErrorBody>().unwrap_or_default()
}

fn server_failure(response: &RawResponse) -> FetchFailure {
    FetchFailure::Server {
        status: response.status.as_u16(),
        body: response.text(),
    }
}

/// Classify a `GET /users/<username>/?page=<n>` response
pub fn classify_profile_page(response: &RawResponse) -> FetchOutcome<Post, UserProfile> {
    if is_unauthenticated(response) {
        return FetchOutcome::Unauthenticated;
    }

    if response.status == StatusCode::NOT_FOUND {
        let body = error_body(response);
        if body.error.as_deref() == Some(EMPTY_PAGE_MARKER) {
            return FetchOutcome::Exhausted;
        }
        if body.detail.as_deref() == Some(NOT_FOUND_DETAIL) {
            return FetchOutcome::NotFound;
        }
        return FetchOutcome::Error(server_failure(response));
    }

    if !response.is_success() {
        return FetchOutcome::Error(server_failure(response));
    }

    match response.json::<ProfilePage>() {
        Ok(page) => FetchOutcome::Success(Page::with_meta(page.posts, page.profile)),
        Err(e) => FetchOutcome::Error(FetchFailure::Decode(e.to_string())),
    }
}

/// Classify a `GET /users/timeline/` response
pub fn classify_timeline(response: &RawResponse) -> FetchOutcome<Post, UserProfile> {
    if !response.is_success() || response.redirected {
        return FetchOutcome::Unauthenticated;
    }

    match response.json::<Vec<Post>>() {
        Ok(posts) => FetchOutcome::Success(Page::new(posts)),
        Err(e) => FetchOutcome::Error(FetchFailure::Decode(e.to_string())),
    }
}

/// Map a transport error to the refresh-required outcome
pub fn network_fault<T, M>(error: &TransportError) -> FetchOutcome<T, M> {
    FetchOutcome::Error(FetchFailure::Network(error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(status: u16, body: serde_json::Value) -> RawResponse {
        let status = StatusCode::from_u16(status).unwrap();
        RawResponse {
            status,
            redirected: status.is_redirection(),
            location: None,
            body: serde_json::to_vec(&body).unwrap().into(),
        }
    }

    fn endpoints() -> Endpoints {
        Endpoints::new(Url::parse("http://localhost:8000").unwrap())
    }

    #[test]
    fn test_endpoint_paths() {
        let e = endpoints();
        assert_eq!(e.login().unwrap().as_str(), "http://localhost:8000/users/login/");
        assert_eq!(e.logout().unwrap().as_str(), "http://localhost:8000/users/logout/");
        assert_eq!(e.dashboard().unwrap().as_str(), "http://localhost:8000/users/dashboard/");
        assert_eq!(e.timeline().unwrap().as_str(), "http://localhost:8000/users/timeline/");
        assert_eq!(
            e.profile("alice", 3).unwrap().as_str(),
            "http://localhost:8000/users/alice/?page=3"
        );
    }

    #[test]
    fn test_profile_username_is_one_segment() {
        let url = endpoints().profile("a/b c", 1).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/users/a%2Fb%20c/?page=1");
    }

    #[test]
    fn test_profile_success() {
        let outcome = classify_profile_page(&response(
            200,
            json!({
                "userName": "alice",
                "totalPosts": 2,
                "posts": [
                    {"id": 1, "user": {"username": "alice"}, "files": []},
                    {"id": 2, "user": {"username": "alice"}, "files": []}
                ]
            }),
        ));
        match outcome {
            FetchOutcome::Success(page) => {
                assert_eq!(page.items.len(), 2);
                assert_eq!(page.meta.unwrap().username, "alice");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_profile_markers() {
        assert_eq!(
            classify_profile_page(&response(404, json!({"error": "emptyPage"}))),
            FetchOutcome::Exhausted
        );
        assert_eq!(
            classify_profile_page(&response(404, json!({"detail": "Not found."}))),
            FetchOutcome::NotFound
        );
        assert_eq!(
            classify_profile_page(&response(302, json!({}))),
            FetchOutcome::Unauthenticated
        );
        assert_eq!(
            classify_profile_page(&response(401, json!({}))),
            FetchOutcome::Unauthenticated
        );
    }

    #[test]
    fn test_profile_unknown_errors_require_refresh() {
        let outcome = classify_profile_page(&response(404, json!({"error": "user not found."})));
        assert!(matches!(
            outcome,
            FetchOutcome::Error(FetchFailure::Server { status: 404, .. })
        ));

        let outcome = classify_profile_page(&response(500, json!({"oops": true})));
        assert!(matches!(
            outcome,
            FetchOutcome::Error(FetchFailure::Server { status: 500, .. })
        ));
    }

    #[test]
    fn test_profile_malformed_body() {
        let outcome = classify_profile_page(&response(200, json!([1, 2, 3])));
        assert!(matches!(outcome, FetchOutcome::Error(FetchFailure::Decode(_))));
    }

    #[test]
    fn test_timeline_classification() {
        let ok = classify_timeline(&response(
            200,
            json!([{"id": 5, "user": {"username": "bob"}, "files": []}]),
        ));
        assert!(matches!(ok, FetchOutcome::Success(ref p) if p.items.len() == 1 && p.meta.is_none()));

        assert_eq!(
            classify_timeline(&response(500, json!({}))),
            FetchOutcome::Unauthenticated
        );
        assert_eq!(
            classify_timeline(&response(302, json!({}))),
            FetchOutcome::Unauthenticated
        );
    }
}
