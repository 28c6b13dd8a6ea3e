use chrono::{DateTime, Utc};

use crate::config::TrackerConfig;
use crate::dwell::ModuleDwellTracker;
use crate::interactions::InteractionLog;
use crate::models::TrackerSnapshot;
use crate::session::SessionLifecycle;
use crate::video::VideoWatchTracker;

/// Everything the tracker mutates, behind one lock. The open dwell session
/// and the session lifecycle are transient; only the snapshot fields
/// survive a restart.
pub(crate) struct TrackerState {
    pub(crate) interactions: InteractionLog,
    pub(crate) dwell: ModuleDwellTracker,
    pub(crate) video: VideoWatchTracker,
    pub(crate) session: Option<SessionLifecycle>,
}

impl TrackerState {
    pub(crate) fn from_snapshot(snapshot: TrackerSnapshot, config: &TrackerConfig) -> Self {
        Self {
            interactions: InteractionLog::from_records(
                snapshot.interactions,
                config.max_interactions,
            ),
            dwell: ModuleDwellTracker::from_totals(snapshot.module_time_spent),
            video: VideoWatchTracker::from_states(snapshot.video_watch_time, config.watch_gap_ms),
            session: None,
        }
    }

    pub(crate) fn to_snapshot(&self, now: DateTime<Utc>) -> TrackerSnapshot {
        TrackerSnapshot {
            video_watch_time: self.video.states().clone(),
            module_time_spent: self.dwell.time_spent().clone(),
            interactions: self.interactions.records().to_vec(),
            last_saved: now,
        }
    }
}
