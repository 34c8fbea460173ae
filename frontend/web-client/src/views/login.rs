//! Login / logout flow

use std::sync::Arc;

use session_transport::SessionTransport;
use tracing::{info, warn};

use crate::api::Endpoints;
use crate::error::Result;
use crate::models::{ApiErrorBody, Credentials};
use crate::navigation::{Navigator, Route};

/// Submitted login form
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Why the login view stayed on screen
#[derive(Debug, Clone, PartialEq)]
pub struct LoginRejection {
    /// `None` when the form was rejected before any request
    pub status: Option<u16>,
    pub error: Option<String>,
    pub code: Option<String>,
    pub body: String,
}

impl LoginRejection {
    fn local(reason: &str) -> Self {
        Self {
            status: None,
            error: Some(reason.to_string()),
            code: Some("missingField".to_string()),
            body: String::new(),
        }
    }

    pub fn message(&self) -> String {
        self.error.clone().unwrap_or_else(|| self.body.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    LoggedIn,
    Rejected(LoginRejection),
}

pub struct LoginFlow {
    transport: SessionTransport,
    endpoints: Endpoints,
    navigator: Arc<dyn Navigator>,
}

impl LoginFlow {
    pub fn new(transport: SessionTransport, endpoints: Endpoints, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            transport,
            endpoints,
            navigator,
        }
    }

    /// Submit the form; on success the session cookie lands in the shared
    /// jar and the view moves to the timeline
    pub async fn submit(&self, form: &LoginForm) -> Result<LoginOutcome> {
        if form.username.trim().is_empty() || form.password.is_empty() {
            return Ok(LoginOutcome::Rejected(LoginRejection::local(
                "username and password are required",
            )));
        }

        let credentials = Credentials {
            username: form.username.clone(),
            password: form.password.clone(),
        };
        let response = self
            .transport
            .post_json(&self.endpoints.login()?, &credentials)
            .await?;

        if response.is_success() {
            info!(username = %form.username, "Logged in");
            self.navigator.navigate(Route::Timeline);
            return Ok(LoginOutcome::LoggedIn);
        }

        let body = response.text();
        warn!(status = response.status.as_u16(), body = %body, "Login rejected");

        let parsed: ApiErrorBody = response.json().unwrap_or_default();
        Ok(LoginOutcome::Rejected(LoginRejection {
            status: Some(response.status.as_u16()),
            error: parsed.error.or(parsed.detail),
            code: parsed.code,
            body,
        }))
    }

    /// End the session and return to the login view
    ///
    /// The view moves to login even when the request fails.
    pub async fn logout(&self) {
        match self.request_logout().await {
            Ok(status) => info!(status, "Logged out"),
            Err(e) => warn!(error = %e, "Logout request failed"),
        }
        self.navigator.navigate(Route::Login);
    }

    async fn request_logout(&self) -> Result<u16> {
        let response = self.transport.get(&self.endpoints.logout()?).await?;
        Ok(response.status.as_u16())
    }
}
