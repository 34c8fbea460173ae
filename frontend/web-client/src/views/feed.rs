//! Consolidated feed view
//!
//! One view type serves the timeline and every profile page. It owns the
//! controller, the sentinel trigger and the navigation seam; rendering reads
//! [`FeedSnapshot`]s and never touches the view's state directly.

use std::sync::Arc;

use feed_pagination::{
    Affordance, Effect, FeedController, LoadReport, LoadState, Trigger, VisibilityTrigger,
};
use parking_lot::Mutex;
use session_transport::SessionTransport;
use tracing::{info, instrument};

use crate::api::Endpoints;
use crate::config::FeedConfig;
use crate::models::{Post, UserProfile};
use crate::navigation::{Navigator, Route};
use crate::sources::{FeedKind, FeedSource};

/// Everything the renderer needs, copied out of the view
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    pub kind: FeedKind,
    pub posts: Vec<Post>,
    pub profile: Option<UserProfile>,
    pub cursor: u32,
    pub load: LoadState,
    pub affordance: Affordance,
}

pub struct FeedView {
    controller: FeedController<FeedSource>,
    trigger: Mutex<VisibilityTrigger>,
    navigator: Arc<dyn Navigator>,
}

impl FeedView {
    pub fn new(
        kind: FeedKind,
        transport: SessionTransport,
        endpoints: Endpoints,
        navigator: Arc<dyn Navigator>,
        config: &FeedConfig,
    ) -> Self {
        let source = FeedSource::new(kind, transport, endpoints);
        Self {
            controller: FeedController::new(source, config.refresh_policy),
            trigger: Mutex::new(VisibilityTrigger::new(config.visibility_threshold)),
            navigator,
        }
    }

    pub fn timeline(
        transport: SessionTransport,
        endpoints: Endpoints,
        navigator: Arc<dyn Navigator>,
        config: &FeedConfig,
    ) -> Self {
        Self::new(FeedKind::Timeline, transport, endpoints, navigator, config)
    }

    pub fn profile(
        username: impl Into<String>,
        transport: SessionTransport,
        endpoints: Endpoints,
        navigator: Arc<dyn Navigator>,
        config: &FeedConfig,
    ) -> Self {
        let kind = FeedKind::Profile {
            username: username.into(),
        };
        Self::new(kind, transport, endpoints, navigator, config)
    }

    pub fn kind(&self) -> &FeedKind {
        self.controller.source().kind()
    }

    pub fn load_state(&self) -> LoadState {
        self.controller.load()
    }

    pub fn affordance(&self) -> Affordance {
        self.controller.affordance()
    }

    /// Report how much of the sentinel is on screen
    ///
    /// Only a hidden → visible edge requests a page.
    pub async fn on_visibility(&self, fraction: f64) -> LoadReport {
        let fired = self.trigger.lock().observe(fraction);
        if !fired {
            return LoadReport::Skipped;
        }
        self.load(Trigger::Visibility).await
    }

    /// User pressed the refresh control
    pub async fn refresh(&self) -> LoadReport {
        info!(feed = %self.kind().label(), "Refresh requested");
        self.load(Trigger::Refresh).await
    }

    #[instrument(skip(self), fields(feed = %self.kind().label()))]
    async fn load(&self, trigger: Trigger) -> LoadReport {
        let report = self.controller.load_more(trigger).await;
        match report.effect() {
            Effect::NavigateToLogin => self.navigator.navigate(Route::Login),
            Effect::NavigateToDefault => self.navigator.navigate(Route::Timeline),
            Effect::None => {}
        }
        report
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        let kind = self.kind().clone();
        self.controller.with_state(|state| FeedSnapshot {
            kind,
            posts: state.items().to_vec(),
            profile: state.meta().cloned(),
            cursor: state.cursor(),
            load: state.load(),
            affordance: state.affordance(),
        })
    }

    /// Posts appended after the first `start` ones
    pub fn posts_from(&self, start: usize) -> Vec<Post> {
        self.controller
            .with_state(|state| state.items().get(start..).map(<[Post]>::to_vec).unwrap_or_default())
    }

    /// Stop the view; an in-flight fetch is dropped
    pub fn teardown(&self) {
        info!(feed = %self.kind().label(), "Feed view torn down");
        self.controller.teardown();
    }
}
