/// Per-view feed state with pure transitions
///
/// State transitions:
/// - Idle → Loading: visibility trigger or manual refresh
/// - Loading → Idle: non-empty page appended, cursor advances
/// - Loading → Exhausted: terminal marker (or empty page), never left again
/// - Loading → NeedsRefresh: any other failure, auto-trigger disabled
/// - NeedsRefresh → Loading: manual refresh only
/// - Loading → NeedsRefresh: fetch dropped before it produced an outcome
/// - Loading → Halted: unauthenticated / not found, view navigates away
/// - any → Halted: teardown
use std::fmt;

use tracing::{debug, info, warn};

use crate::outcome::{FetchOutcome, Page};

/// First page index of every feed
pub const FIRST_PAGE: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Waiting for the sentinel to come into view
    Idle,
    /// A fetch is in flight
    Loading,
    /// No more pages for this view
    Exhausted,
    /// Last fetch failed, waiting for a manual refresh
    NeedsRefresh,
    /// View navigated away or was torn down
    Halted,
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Exhausted => "exhausted",
            Self::NeedsRefresh => "needs_refresh",
            Self::Halted => "halted",
        };
        f.write_str(name)
    }
}

/// What asked for the next page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Sentinel entered the viewport
    Visibility,
    /// User pressed refresh
    Refresh,
}

/// Which page a refresh asks for after a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshPolicy {
    /// Refresh re-requests the page that failed
    #[default]
    RetryFailedPage,
    /// The failed page is skipped; refresh requests the one after it
    SkipFailedPage,
}

impl std::str::FromStr for RefreshPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "retry-failed-page" => Ok(Self::RetryFailedPage),
            "skip-failed-page" => Ok(Self::SkipFailedPage),
            other => Err(format!("unknown refresh policy: {}", other)),
        }
    }
}

/// Side effect the view must perform after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    NavigateToLogin,
    NavigateToDefault,
}

/// What the sentinel slot shows, derived from the load state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    Spinner,
    Refresh,
    Hidden,
}

#[derive(Debug, Clone)]
pub struct FeedState<T, M = ()> {
    items: Vec<T>,
    meta: Option<M>,
    cursor: u32,
    load: LoadState,
    policy: RefreshPolicy,
}

impl<T, M> Default for FeedState<T, M> {
    fn default() -> Self {
        Self::new(RefreshPolicy::default())
    }
}

impl<T, M> FeedState<T, M> {
    pub fn new(policy: RefreshPolicy) -> Self {
        Self {
            items: Vec::new(),
            meta: None,
            cursor: FIRST_PAGE,
            load: LoadState::Idle,
            policy,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn meta(&self) -> Option<&M> {
        self.meta.as_ref()
    }

    /// Page the next fetch will request
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    pub fn load(&self) -> LoadState {
        self.load
    }

    pub fn policy(&self) -> RefreshPolicy {
        self.policy
    }

    pub fn affordance(&self) -> Affordance {
        match self.load {
            LoadState::Idle | LoadState::Loading => Affordance::Spinner,
            LoadState::NeedsRefresh => Affordance::Refresh,
            LoadState::Exhausted | LoadState::Halted => Affordance::Hidden,
        }
    }

    /// Start a load if the trigger is allowed in the current state
    ///
    /// Returns the cursor to fetch, or `None` when the trigger must be
    /// ignored. `Loading` rejects every trigger, which is the in-flight guard.
    pub fn begin(&mut self, trigger: Trigger) -> Option<u32> {
        let allowed = match (self.load, trigger) {
            (LoadState::Idle, _) => true,
            (LoadState::NeedsRefresh, Trigger::Refresh) => true,
            _ => false,
        };

        if !allowed {
            debug!(state = %self.load, ?trigger, "Load trigger ignored");
            return None;
        }

        self.load = LoadState::Loading;
        Some(self.cursor)
    }

    /// Apply the outcome of the fetch started by [`FeedState::begin`]
    ///
    /// Outcomes arriving outside `Loading` (after teardown) are dropped.
    pub fn apply(&mut self, outcome: FetchOutcome<T, M>) -> Effect {
        if self.load != LoadState::Loading {
            debug!(state = %self.load, outcome = outcome.kind(), "Stale fetch outcome discarded");
            return Effect::None;
        }

        match outcome {
            FetchOutcome::Success(page) => {
                self.append(page);
                Effect::None
            }
            FetchOutcome::Exhausted => {
                info!(cursor = self.cursor, "Feed exhausted");
                self.load = LoadState::Exhausted;
                Effect::None
            }
            FetchOutcome::NotFound => {
                info!(cursor = self.cursor, "Feed owner not found, leaving view");
                self.load = LoadState::Halted;
                Effect::NavigateToDefault
            }
            FetchOutcome::Unauthenticated => {
                info!(cursor = self.cursor, "Session not authenticated, leaving view");
                self.load = LoadState::Halted;
                Effect::NavigateToLogin
            }
            FetchOutcome::Error(failure) => {
                warn!(cursor = self.cursor, error = %failure, "Page fetch failed, refresh required");
                if self.policy == RefreshPolicy::SkipFailedPage {
                    self.cursor += 1;
                }
                self.load = LoadState::NeedsRefresh;
                Effect::None
            }
        }
    }

    /// Drop the fetch started by [`FeedState::begin`] without an outcome
    ///
    /// No-op outside `Loading`. The cursor is kept, so refresh asks for the
    /// same page again.
    pub fn abandon(&mut self) {
        if self.load == LoadState::Loading {
            warn!(cursor = self.cursor, "In-flight fetch abandoned, refresh required");
            self.load = LoadState::NeedsRefresh;
        }
    }

    /// Stop the view for good
    pub fn halt(&mut self) {
        self.load = LoadState::Halted;
    }

    fn append(&mut self, page: Page<T, M>) {
        if let Some(meta) = page.meta {
            self.meta = Some(meta);
        }

        if page.items.is_empty() {
            info!(cursor = self.cursor, "Empty page, feed exhausted");
            self.load = LoadState::Exhausted;
            return;
        }

        let count = page.items.len();
        self.items.extend(page.items);
        self.cursor += 1;
        self.load = LoadState::Idle;
        info!(count, total = self.items.len(), next_cursor = self.cursor, "Page appended");
    }
}
