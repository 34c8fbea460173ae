//! Signed-in user's own profile

use std::sync::Arc;

use session_transport::SessionTransport;
use tracing::warn;

use crate::api::{self, Endpoints};
use crate::error::{ClientError, Result};
use crate::models::DashboardProfile;
use crate::navigation::{Navigator, Route};

pub struct DashboardView {
    transport: SessionTransport,
    endpoints: Endpoints,
    navigator: Arc<dyn Navigator>,
}

impl DashboardView {
    pub fn new(transport: SessionTransport, endpoints: Endpoints, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            transport,
            endpoints,
            navigator,
        }
    }

    /// Fetch the dashboard; a missing session navigates to login
    pub async fn load(&self) -> Result<DashboardProfile> {
        let response = self.transport.get(&self.endpoints.dashboard()?).await?;

        if api::is_unauthenticated(&response) {
            self.navigator.navigate(Route::Login);
            return Err(ClientError::Unauthenticated);
        }

        if !response.is_success() {
            let body = response.text();
            warn!(status = response.status.as_u16(), body = %body, "Dashboard request failed");
            return Err(ClientError::UnexpectedResponse {
                status: response.status.as_u16(),
                body,
            });
        }

        Ok(response.json()?)
    }
}
