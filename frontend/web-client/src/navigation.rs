//! Client routes and the navigation seam

use parking_lot::Mutex;
use std::fmt;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    /// Authenticated landing view, also the fallback for unknown profiles
    Timeline,
    Profile(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Timeline => "/".to_string(),
            Self::Profile(username) => format!("/{}", username),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Receives navigation side effects from views
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that records every route it was sent to
#[derive(Debug, Default)]
pub struct HistoryNavigator {
    history: Mutex<Vec<Route>>,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Route> {
        self.history.lock().last().cloned()
    }

    pub fn history(&self) -> Vec<Route> {
        self.history.lock().clone()
    }

    /// Take the routes recorded since the last call
    pub fn drain(&self) -> Vec<Route> {
        std::mem::take(&mut *self.history.lock())
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, route: Route) {
        info!(route = %route, "Navigating");
        self.history.lock().push(route);
    }
}
