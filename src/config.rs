use std::time::Duration;

/// Configuration for the progress tracker with tunable thresholds.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Key the snapshot blob is persisted under in the durable store.
    pub storage_key: String,

    /// Sliding-window cap on the interaction log; oldest entries are
    /// evicted first once the cap is exceeded.
    pub max_interactions: usize,

    /// Video ticks further apart than this start a new watch session
    /// instead of extending the current one.
    pub watch_gap_ms: u64,

    /// Period of the background snapshot flush.
    pub flush_interval: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            storage_key: "progress_tracking".to_string(),
            max_interactions: 1000,
            watch_gap_ms: 60_000,
            flush_interval: Duration::from_secs(30),
        }
    }
}
