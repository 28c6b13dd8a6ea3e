use std::collections::HashMap;

use serde::Serialize;

use super::CompletionState;
use crate::models::{InteractionKind, InteractionRecord, VideoWatchState};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    /// Completed modules as a rounded percentage of the catalog.
    pub overall_progress: u32,
    pub completed_modules: u32,
    pub total_modules: u32,
    /// Sum of all per-module dwell time, in milliseconds.
    pub time_spent_total: u64,
    /// Mean dwell time over the modules actually visited; 0 when none.
    pub average_time_per_module: u64,
    pub videos_watched: usize,
    pub assignments_submitted: usize,
}

pub fn summary(
    module_time_spent: &HashMap<u32, u64>,
    videos: &HashMap<String, VideoWatchState>,
    interactions: &[InteractionRecord],
    completion: &CompletionState,
) -> ProgressSummary {
    let completed_modules = completion.completed.len() as u32;
    let overall_progress = if completion.total_modules > 0 {
        ((completed_modules as f64 / completion.total_modules as f64) * 100.0).round() as u32
    } else {
        0
    };

    let time_spent_total: u64 = module_time_spent.values().sum();
    let modules_tracked = module_time_spent.len() as u64;
    let average_time_per_module = if modules_tracked > 0 {
        time_spent_total / modules_tracked
    } else {
        0
    };

    ProgressSummary {
        overall_progress,
        completed_modules,
        total_modules: completion.total_modules,
        time_spent_total,
        average_time_per_module,
        videos_watched: videos.len(),
        assignments_submitted: interactions
            .iter()
            .filter(|record| record.kind == InteractionKind::AssignmentSubmit)
            .count(),
    }
}
