use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use log::warn;

use crate::models::{VideoWatchState, WatchSession};

/// Per-video watch-session history and last-known playback position.
/// Consecutive ticks within `gap` of each other extend the current watch
/// session; a longer silence means the viewer resumed after a break and
/// starts a new one.
pub struct VideoWatchTracker {
    videos: HashMap<String, VideoWatchState>,
    gap: Duration,
}

impl VideoWatchTracker {
    pub fn new(gap_ms: u64) -> Self {
        Self::from_states(HashMap::new(), gap_ms)
    }

    pub fn from_states(videos: HashMap<String, VideoWatchState>, gap_ms: u64) -> Self {
        Self {
            videos,
            gap: Duration::milliseconds(gap_ms.min(i64::MAX as u64) as i64),
        }
    }

    /// Record a playback tick for `video_id` at `current_time` seconds into
    /// a video of `duration` seconds. A degenerate duration (zero, negative
    /// or non-finite) leaves the stored completion percentage at its last
    /// valid reading rather than propagating NaN or infinity.
    pub fn track(&mut self, video_id: &str, current_time: f64, duration: f64, now: DateTime<Utc>) {
        if !current_time.is_finite() {
            warn!("Ignoring video tick for {video_id}: position {current_time} is not finite");
            return;
        }

        let state = self.videos.entry(video_id.to_string()).or_default();
        state.last_position = current_time;

        if duration.is_finite() && duration > 0.0 {
            state.completion_percentage = ((current_time / duration) * 100.0).round().max(0.0) as u32;
        } else {
            warn!(
                "Video {video_id} reported duration {duration}; keeping completion at {}%",
                state.completion_percentage
            );
        }

        let start_new = match state.watch_sessions.last() {
            Some(last) => now - last.end > self.gap,
            None => true,
        };

        if start_new {
            state.watch_sessions.push(WatchSession {
                start: now,
                end: now,
                start_time: current_time,
                end_time: current_time,
            });
        } else if let Some(last) = state.watch_sessions.last_mut() {
            last.end = now;
            last.end_time = current_time;
        }
    }

    pub fn states(&self) -> &HashMap<String, VideoWatchState> {
        &self.videos
    }

    pub fn get(&self, video_id: &str) -> Option<&VideoWatchState> {
        self.videos.get(video_id)
    }
}
