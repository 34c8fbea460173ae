/// Feed controller: drives one view's [`FeedState`] from a [`PageSource`]
///
/// The state lock is never held across the fetch; the `Loading` state is
/// what keeps a second fetch from starting. Teardown halts the state and
/// wakes any outstanding fetch so its result is dropped.
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::outcome::FetchOutcome;
use crate::state::{Affordance, Effect, FeedState, LoadState, RefreshPolicy, Trigger};

/// Where pages come from
#[async_trait]
pub trait PageSource: Send + Sync {
    type Item: Send;
    type Meta: Send;

    /// Fetch the page at `cursor` and classify the response
    async fn fetch_page(&self, cursor: u32) -> FetchOutcome<Self::Item, Self::Meta>;
}

/// Result of one [`FeedController::load_more`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadReport {
    /// Trigger not allowed in the current state, nothing was requested
    Skipped,
    /// The view was torn down while the fetch was in flight
    Cancelled,
    /// A fetch completed and its outcome was applied
    Applied {
        cursor: u32,
        effect: Effect,
        load: LoadState,
    },
}

impl LoadReport {
    pub fn effect(&self) -> Effect {
        match self {
            Self::Applied { effect, .. } => *effect,
            Self::Skipped | Self::Cancelled => Effect::None,
        }
    }
}

/// Held while a fetch is outstanding
///
/// If `load_more` is dropped mid-fetch (outer timeout, `select!`, panicking
/// source) the state would stay `Loading` and reject every trigger; dropping
/// this moves it to `NeedsRefresh` instead.
struct InFlight<'a, T, M> {
    state: &'a Mutex<FeedState<T, M>>,
}

impl<T, M> Drop for InFlight<'_, T, M> {
    fn drop(&mut self) {
        self.state.lock().abandon();
    }
}

pub struct FeedController<S: PageSource> {
    source: S,
    state: Mutex<FeedState<S::Item, S::Meta>>,
    shutdown_tx: watch::Sender<bool>,
}

impl<S: PageSource> FeedController<S> {
    pub fn new(source: S, policy: RefreshPolicy) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            source,
            state: Mutex::new(FeedState::new(policy)),
            shutdown_tx,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn load(&self) -> LoadState {
        self.state.lock().load()
    }

    pub fn cursor(&self) -> u32 {
        self.state.lock().cursor()
    }

    pub fn affordance(&self) -> Affordance {
        self.state.lock().affordance()
    }

    /// Read the state under the lock
    pub fn with_state<R>(&self, f: impl FnOnce(&FeedState<S::Item, S::Meta>) -> R) -> R {
        f(&self.state.lock())
    }

    /// Request the next page
    pub async fn load_more(&self, trigger: Trigger) -> LoadReport {
        // Subscribe before checking state so a teardown racing this call is
        // either seen by `begin` (Halted) or by the select below.
        let mut shutdown = self.shutdown_tx.subscribe();

        let cursor = {
            let mut state = self.state.lock();
            state.begin(trigger)
        };
        let Some(cursor) = cursor else {
            return LoadReport::Skipped;
        };

        debug!(cursor, ?trigger, "Fetching page");

        let in_flight = InFlight { state: &self.state };

        let outcome = tokio::select! {
            biased;
            _ = shutdown.changed() => {
                info!(cursor, "View torn down, in-flight page dropped");
                return LoadReport::Cancelled;
            }
            outcome = self.source.fetch_page(cursor) => outcome,
        };

        let report = {
            let mut state = self.state.lock();
            let effect = state.apply(outcome);
            LoadReport::Applied {
                cursor,
                effect,
                load: state.load(),
            }
        };
        drop(in_flight);
        report
    }

    /// Halt the view and cancel an outstanding fetch
    pub fn teardown(&self) {
        self.state.lock().halt();
        self.shutdown_tx.send_replace(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Page;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingSource {
        calls: AtomicU32,
    }

    #[async_trait]
    impl PageSource for CountingSource {
        type Item = u32;
        type Meta = ();

        async fn fetch_page(&self, cursor: u32) -> FetchOutcome<u32> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if cursor > 2 {
                FetchOutcome::Exhausted
            } else {
                FetchOutcome::Success(Page::new(vec![cursor * 10, cursor * 10 + 1]))
            }
        }
    }

    #[tokio::test]
    async fn test_load_more_until_exhausted() {
        let controller = FeedController::new(
            CountingSource {
                calls: AtomicU32::new(0),
            },
            RefreshPolicy::default(),
        );

        for _ in 0..3 {
            controller.load_more(Trigger::Visibility).await;
        }
        assert_eq!(controller.load(), LoadState::Exhausted);
        assert_eq!(controller.load_more(Trigger::Visibility).await, LoadReport::Skipped);

        assert_eq!(controller.source().calls.load(Ordering::SeqCst), 3);
        controller.with_state(|s| assert_eq!(s.items(), &[10, 11, 20, 21]));
    }

    #[tokio::test]
    async fn test_teardown_before_load_skips() {
        let controller = FeedController::new(
            CountingSource {
                calls: AtomicU32::new(0),
            },
            RefreshPolicy::default(),
        );
        controller.teardown();

        assert_eq!(controller.load_more(Trigger::Visibility).await, LoadReport::Skipped);
        assert_eq!(controller.source().calls.load(Ordering::SeqCst), 0);
        assert_eq!(controller.affordance(), Affordance::Hidden);
    }
}
