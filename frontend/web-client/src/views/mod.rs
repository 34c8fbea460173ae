pub mod dashboard;
pub mod feed;
pub mod login;
pub mod render;

pub use dashboard::DashboardView;
pub use feed::{FeedSnapshot, FeedView};
pub use login::{LoginFlow, LoginForm, LoginOutcome, LoginRejection};
pub use render::Renderer;
