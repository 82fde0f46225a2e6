//! Status and Loading Presenter
//!
//! Everything the kiosk shows besides record lists: the status line, the
//! loading overlay and the recent-activity feed.

mod activity;
mod loading;
mod status;

pub use activity::{Activity, ActivityKind, RecentActivity, MAX_ACTIVITIES};
pub use loading::{LoadingGuard, LoadingOverlay};
pub use status::{AutoHide, Status, StatusKind, StatusPresenter, AUTO_HIDE_DELAY, IDLE_MESSAGE};
