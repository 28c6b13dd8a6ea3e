use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A contiguous interval of playback: wall-clock bounds plus the
/// playback positions (in seconds) at either end.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchSession {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub start_time: f64,
    pub end_time: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VideoWatchState {
    /// Reserved accumulator; not derived by the tracker itself.
    pub total_watched: u64,
    /// Rounded percentage from the latest valid (position, duration) pair.
    pub completion_percentage: u32,
    /// Playback position (seconds) at the last tick.
    pub last_position: f64,
    pub watch_sessions: Vec<WatchSession>,
}

impl VideoWatchState {
    /// Sum of the recorded watch-session spans, in milliseconds.
    pub fn watched_ms(&self) -> u64 {
        self.watch_sessions
            .iter()
            .map(|session| (session.end - session.start).num_milliseconds().max(0) as u64)
            .sum()
    }
}
