//! Engagement and progress analytics for a learning dashboard: session
//! lifecycle, per-module dwell time, per-video watch sessions and a
//! bounded interaction log, with derived summaries, behavioral patterns
//! and study-streak statistics on top.

pub mod analytics;
mod config;
mod dwell;
mod format;
mod interactions;
pub mod models;
mod session;
pub mod store;
mod tracker;
mod video;

pub use config::TrackerConfig;
pub use dwell::ModuleDwellTracker;
pub use format::format_duration_ms;
pub use interactions::InteractionLog;
pub use session::{SessionEnv, SessionLifecycle};
pub use tracker::ProgressTracker;
pub use video::VideoWatchTracker;
