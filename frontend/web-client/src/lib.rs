//! Instamoc web client
//!
//! Timeline, profile and login views over the Instamoc HTTP API:
//! - session transport with cookie-carried CSRF token (`session-transport`)
//! - visibility-triggered pagination (`feed-pagination`)
//! - response classification, navigation and text rendering (this crate)

pub mod api;
pub mod config;
pub mod error;
pub mod media;
pub mod models;
pub mod navigation;
pub mod sources;
pub mod views;

pub use config::Config;
pub use error::{ClientError, Result};
pub use navigation::{HistoryNavigator, Navigator, Route};
pub use sources::FeedKind;
pub use views::{DashboardView, FeedSnapshot, FeedView, LoginFlow, LoginForm, LoginOutcome, Renderer};
