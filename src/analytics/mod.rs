//! Pure, read-only derivations over tracker state: progress summary,
//! behavioral patterns, study streaks and per-module drill-downs. Nothing
//! here mutates the trackers; every query is recomputed on demand.

mod export;
mod patterns;
mod streak;
mod summary;

pub use export::{export, module_progress, ModuleProgress, ProgressExport};
pub use patterns::{learning_patterns, LearningPatterns};
pub use streak::{study_streak, StudyStreak};
pub use summary::{summary, ProgressSummary};

/// Completion data owned by the module catalog, not by the tracker. The
/// caller supplies it per query.
#[derive(Debug, Clone, Default)]
pub struct CompletionState {
    pub completed: Vec<u32>,
    pub total_modules: u32,
}

impl CompletionState {
    pub fn is_completed(&self, module_id: u32) -> bool {
        self.completed.contains(&module_id)
    }
}
