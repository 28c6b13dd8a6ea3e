use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{InteractionRecord, VideoWatchState};

/// The complete persisted state of the tracker at a point in time. This is
/// the unit that round-trips through a [`DurableStore`](crate::store::DurableStore).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrackerSnapshot {
    #[serde(default)]
    pub video_watch_time: HashMap<String, VideoWatchState>,
    #[serde(default)]
    pub module_time_spent: HashMap<u32, u64>,
    #[serde(default)]
    pub interactions: Vec<InteractionRecord>,
    #[serde(default = "Utc::now")]
    pub last_saved: DateTime<Utc>,
}

impl Default for TrackerSnapshot {
    fn default() -> Self {
        Self {
            video_watch_time: HashMap::new(),
            module_time_spent: HashMap::new(),
            interactions: Vec::new(),
            last_saved: Utc::now(),
        }
    }
}

impl TrackerSnapshot {
    /// Decode a persisted blob, recovering field by field: a field that is
    /// missing or fails to decode comes back empty instead of failing the
    /// whole load.
    pub fn from_blob(blob: &str) -> Self {
        let value: Value = match serde_json::from_str(blob) {
            Ok(value) => value,
            Err(err) => {
                warn!("Discarding unreadable snapshot blob: {err}");
                return Self::default();
            }
        };

        let mut snapshot = Self::default();
        let Some(fields) = value.as_object() else {
            warn!("Snapshot blob is not an object; starting empty");
            return snapshot;
        };

        if let Some(raw) = fields.get("videoWatchTime") {
            match serde_json::from_value(raw.clone()) {
                Ok(parsed) => snapshot.video_watch_time = parsed,
                Err(err) => warn!("Ignoring corrupt videoWatchTime field: {err}"),
            }
        }
        if let Some(raw) = fields.get("moduleTimeSpent") {
            match serde_json::from_value(raw.clone()) {
                Ok(parsed) => snapshot.module_time_spent = parsed,
                Err(err) => warn!("Ignoring corrupt moduleTimeSpent field: {err}"),
            }
        }
        if let Some(raw) = fields.get("interactions") {
            match serde_json::from_value(raw.clone()) {
                Ok(parsed) => snapshot.interactions = parsed,
                Err(err) => warn!("Ignoring corrupt interactions field: {err}"),
            }
        }
        if let Some(raw) = fields.get("lastSaved") {
            match serde_json::from_value(raw.clone()) {
                Ok(parsed) => snapshot.last_saved = parsed,
                Err(err) => warn!("Ignoring corrupt lastSaved field: {err}"),
            }
        }

        snapshot
    }

    pub fn to_blob(&self) -> Result<String> {
        serde_json::to_string(self).context("failed to serialize tracker snapshot")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{payload, InteractionKind};
    use chrono::TimeZone;
    use serde_json::json;

    fn sample_snapshot() -> TrackerSnapshot {
        let stamp = Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap();
        TrackerSnapshot {
            video_watch_time: HashMap::from([(
                "intro".to_string(),
                VideoWatchState {
                    completion_percentage: 42,
                    last_position: 50.5,
                    ..VideoWatchState::default()
                },
            )]),
            module_time_spent: HashMap::from([(3, 120_000)]),
            interactions: vec![InteractionRecord {
                kind: InteractionKind::ModuleStart,
                data: payload(json!({ "moduleId": 3 })),
                timestamp: stamp,
            }],
            last_saved: stamp,
        }
    }

    #[test]
    fn blob_round_trip_is_lossless() {
        let snapshot = sample_snapshot();
        let blob = snapshot.to_blob().unwrap();
        assert_eq!(TrackerSnapshot::from_blob(&blob), snapshot);
    }

    #[test]
    fn missing_fields_load_as_empty() {
        let snapshot = TrackerSnapshot::from_blob(r#"{"moduleTimeSpent":{"5":9000}}"#);
        assert_eq!(snapshot.module_time_spent.get(&5), Some(&9000));
        assert!(snapshot.video_watch_time.is_empty());
        assert!(snapshot.interactions.is_empty());
    }

    #[test]
    fn corrupt_field_is_dropped_without_losing_the_rest() {
        let blob = r#"{"moduleTimeSpent":"not a map","interactions":[],"videoWatchTime":{}}"#;
        let snapshot = TrackerSnapshot::from_blob(blob);
        assert!(snapshot.module_time_spent.is_empty());
        assert!(snapshot.interactions.is_empty());
    }

    #[test]
    fn unreadable_blob_falls_back_to_default() {
        let snapshot = TrackerSnapshot::from_blob("{{{{");
        assert!(snapshot.interactions.is_empty());
        assert!(snapshot.module_time_spent.is_empty());
    }
}
