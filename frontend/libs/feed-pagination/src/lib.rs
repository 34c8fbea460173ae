//! Paginated feed loading
//!
//! Visibility-triggered, append-only page loading with explicit failure
//! recovery:
//! - [`state::FeedState`]: per-view state and pure transitions
//! - [`visibility::VisibilityTrigger`]: sentinel edge detection
//! - [`controller::FeedController`]: one in-flight fetch at a time, teardown cancellation
//!
//! # Example
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use feed_pagination::{FeedController, FetchOutcome, Page, PageSource, RefreshPolicy, Trigger};
//!
//! struct Numbers;
//!
//! #[async_trait]
//! impl PageSource for Numbers {
//!     type Item = u32;
//!     type Meta = ();
//!
//!     async fn fetch_page(&self, cursor: u32) -> FetchOutcome<u32> {
//!         FetchOutcome::Success(Page::new(vec![cursor]))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let controller = FeedController::new(Numbers, RefreshPolicy::default());
//!     controller.load_more(Trigger::Visibility).await;
//! }
//! ```

pub mod controller;
pub mod outcome;
pub mod state;
pub mod visibility;

pub use controller::{FeedController, LoadReport, PageSource};
pub use outcome::{FetchFailure, FetchOutcome, Page};
pub use state::{Affordance, Effect, FeedState, LoadState, RefreshPolicy, Trigger, FIRST_PAGE};
pub use visibility::VisibilityTrigger;
