use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{summary, CompletionState, ProgressSummary};
use crate::models::{InteractionRecord, VideoWatchState};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModuleProgress {
    pub module_id: u32,
    /// Accumulated dwell time in milliseconds; 0 for modules never visited.
    pub time_spent: u64,
    pub completed: bool,
    /// Count of interactions whose payload touched this module.
    pub interactions: usize,
    pub last_accessed: Option<DateTime<Utc>>,
}

pub fn module_progress(
    module_time_spent: &HashMap<u32, u64>,
    interactions: &[InteractionRecord],
    completion: &CompletionState,
    module_id: u32,
) -> ModuleProgress {
    let mut count = 0;
    let mut last_accessed = None;
    for record in interactions {
        if record.module_id() == Some(module_id) {
            count += 1;
            last_accessed = Some(record.timestamp);
        }
    }

    ModuleProgress {
        module_id,
        time_spent: module_time_spent.get(&module_id).copied().unwrap_or(0),
        completed: completion.is_completed(module_id),
        interactions: count,
        last_accessed,
    }
}

/// Full dump of tracker state: the summary, a per-module entry for every
/// catalog id (visited or not), the video map and the raw interaction log.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressExport {
    pub summary: ProgressSummary,
    pub module_progress: BTreeMap<u32, ModuleProgress>,
    pub video_progress: HashMap<String, VideoWatchState>,
    pub interactions: Vec<InteractionRecord>,
    pub exported_at: DateTime<Utc>,
}

pub fn export(
    module_time_spent: &HashMap<u32, u64>,
    videos: &HashMap<String, VideoWatchState>,
    interactions: &[InteractionRecord],
    completion: &CompletionState,
    now: DateTime<Utc>,
) -> ProgressExport {
    let per_module: BTreeMap<u32, ModuleProgress> = (1..=completion.total_modules)
        .map(|id| {
            (
                id,
                module_progress(module_time_spent, interactions, completion, id),
            )
        })
        .collect();

    ProgressExport {
        summary: summary(module_time_spent, videos, interactions, completion),
        module_progress: per_module,
        video_progress: videos.clone(),
        interactions: interactions.to_vec(),
        exported_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{payload, InteractionKind};
    use chrono::TimeZone;
    use serde_json::json;

    fn stamp(offset_secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap() + chrono::Duration::seconds(offset_secs)
    }

    fn record(module_id: u32, offset_secs: i64) -> InteractionRecord {
        InteractionRecord {
            kind: InteractionKind::ModuleStart,
            data: payload(json!({ "moduleId": module_id })),
            timestamp: stamp(offset_secs),
        }
    }

    #[test]
    fn module_progress_reports_latest_touch() {
        let interactions = vec![record(2, 0), record(2, 30), record(5, 60)];
        let completion = CompletionState {
            completed: vec![2],
            total_modules: 12,
        };
        let progress = module_progress(&HashMap::new(), &interactions, &completion, 2);

        assert_eq!(progress.interactions, 2);
        assert!(progress.completed);
        assert_eq!(progress.last_accessed, Some(stamp(30)));
        assert_eq!(progress.time_spent, 0);
    }

    #[test]
    fn export_covers_every_catalog_module() {
        let completion = CompletionState {
            completed: vec![1],
            total_modules: 12,
        };
        let time_spent = HashMap::from([(1, 45_000u64)]);
        let dump = export(&time_spent, &HashMap::new(), &[record(1, 0)], &completion, stamp(99));

        assert_eq!(dump.module_progress.len(), 12);
        let untouched = &dump.module_progress[&9];
        assert_eq!(untouched.time_spent, 0);
        assert!(!untouched.completed);
        assert!(untouched.last_accessed.is_none());

        let visited = &dump.module_progress[&1];
        assert_eq!(visited.time_spent, 45_000);
        assert!(visited.completed);
        assert_eq!(dump.exported_at, stamp(99));
    }
}
