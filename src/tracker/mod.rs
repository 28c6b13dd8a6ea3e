mod state;

use std::sync::Arc;

use anyhow::Result;
use chrono::{Local, Utc};
use log::{error, info, warn};
use serde_json::{json, Value};
use tokio::{sync::Mutex, task::JoinHandle, time};

use crate::analytics::{
    self, CompletionState, LearningPatterns, ModuleProgress, ProgressExport, ProgressSummary,
    StudyStreak,
};
use crate::config::TrackerConfig;
use crate::models::{payload, InteractionKind, TrackerSnapshot};
use crate::session::{SessionEnv, SessionLifecycle};
use crate::store::DurableStore;

use state::TrackerState;

/// The engagement/progress tracker. Explicitly constructed and injectable:
/// the hosting application owns an instance (clones share state) and feeds
/// it UI events; analytics queries read the same in-memory state.
///
/// Persistence is a snapshot blob under `config.storage_key`: loaded once
/// at construction, flushed on a fixed period once a session starts, and
/// flushed a final time from [`shutdown`](Self::shutdown). The shutdown
/// call is advisory; a host that dies without it loses at most the last
/// flush interval of data.
pub struct ProgressTracker {
    state: Arc<Mutex<TrackerState>>,
    store: Arc<dyn DurableStore>,
    config: TrackerConfig,
    flusher: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl ProgressTracker {
    /// Build a tracker over `store`, recovering whatever snapshot it holds.
    /// A missing, partial or corrupt snapshot degrades to empty state and
    /// is never an error.
    pub fn new(store: Arc<dyn DurableStore>, config: TrackerConfig) -> Self {
        let snapshot = match store.load(&config.storage_key) {
            Ok(Some(blob)) => TrackerSnapshot::from_blob(&blob),
            Ok(None) => TrackerSnapshot::default(),
            Err(err) => {
                warn!("Failed to load snapshot; starting empty: {err:#}");
                TrackerSnapshot::default()
            }
        };

        Self {
            state: Arc::new(Mutex::new(TrackerState::from_snapshot(snapshot, &config))),
            store,
            config,
            flusher: Arc::new(Mutex::new(None)),
        }
    }

    /// Mark the session start and begin periodic flushing. Environment
    /// descriptors come from the caller; the tracker records them verbatim.
    pub async fn start_session(&self, env: SessionEnv) {
        let now = Utc::now();
        {
            let mut guard = self.state.lock().await;
            if guard.session.as_ref().is_some_and(|s| !s.is_ended()) {
                warn!("Session already running; ignoring start_session");
                return;
            }
            let session = SessionLifecycle::start(&mut guard.interactions, &env, now);
            guard.session = Some(session);
        }
        self.spawn_flusher().await;
    }

    pub async fn module_opened(&self, module_id: u32) {
        let now = Utc::now();
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        state.dwell.start(&mut state.interactions, module_id, now);
    }

    /// Close the open dwell session, whichever module it belongs to.
    /// No-op if nothing is open.
    pub async fn module_closed(&self) {
        let now = Utc::now();
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        state.dwell.stop(&mut state.interactions, now);
    }

    pub async fn video_progress(&self, video_id: &str, current_time: f64, duration: f64) {
        let now = Utc::now();
        let mut guard = self.state.lock().await;
        guard.video.track(video_id, current_time, duration, now);
    }

    pub async fn assignment_submitted(
        &self,
        module_id: u32,
        assignment_type: &str,
        submission: Value,
    ) {
        let now = Utc::now();
        let mut guard = self.state.lock().await;
        guard.interactions.append(
            InteractionKind::AssignmentSubmit,
            payload(json!({
                "moduleId": module_id,
                "assignmentType": assignment_type,
                "submissionData": submission,
                "timestamp": now.to_rfc3339(),
            })),
            now,
        );
    }

    /// Log a completion event carrying the dwell time accumulated so far.
    /// The completed-module list itself lives with the catalog collaborator.
    pub async fn module_completed(&self, module_id: u32) {
        let now = Utc::now();
        let mut guard = self.state.lock().await;
        let time_spent = guard.dwell.total_for(module_id);
        guard.interactions.append(
            InteractionKind::ModuleComplete,
            payload(json!({
                "moduleId": module_id,
                "timestamp": now.to_rfc3339(),
                "timeSpent": time_spent,
            })),
            now,
        );
    }

    pub async fn github_action(&self, action: &str, repo_url: &str) {
        let now = Utc::now();
        let mut guard = self.state.lock().await;
        guard.interactions.append(
            InteractionKind::GithubInteraction,
            payload(json!({
                "action": action,
                "repoUrl": repo_url,
                "timestamp": now.to_rfc3339(),
            })),
            now,
        );
    }

    pub async fn summary(&self, completion: &CompletionState) -> ProgressSummary {
        let guard = self.state.lock().await;
        analytics::summary(
            guard.dwell.time_spent(),
            guard.video.states(),
            guard.interactions.records(),
            completion,
        )
    }

    pub async fn learning_patterns(&self) -> LearningPatterns {
        let guard = self.state.lock().await;
        analytics::learning_patterns(guard.interactions.records())
    }

    pub async fn study_streak(&self) -> StudyStreak {
        let guard = self.state.lock().await;
        analytics::study_streak(guard.interactions.records(), Local::now().date_naive())
    }

    pub async fn module_progress(
        &self,
        module_id: u32,
        completion: &CompletionState,
    ) -> ModuleProgress {
        let guard = self.state.lock().await;
        analytics::module_progress(
            guard.dwell.time_spent(),
            guard.interactions.records(),
            completion,
            module_id,
        )
    }

    pub async fn export_snapshot(&self, completion: &CompletionState) -> ProgressExport {
        let guard = self.state.lock().await;
        analytics::export(
            guard.dwell.time_spent(),
            guard.video.states(),
            guard.interactions.records(),
            completion,
            Utc::now(),
        )
    }

    /// Persist the current snapshot. A store failure leaves in-memory
    /// state untouched; the periodic flusher simply retries next period.
    pub async fn flush(&self) -> Result<()> {
        let blob = {
            let guard = self.state.lock().await;
            guard.to_snapshot(Utc::now()).to_blob()?
        };
        self.store.save(&self.config.storage_key, &blob)
    }

    /// End the session and flush one last time. Advisory: hosts should
    /// call this from their termination hook, but the tracker stays
    /// consistent if they never do.
    pub async fn shutdown(&self) -> Result<()> {
        self.cancel_flusher().await;

        let now = Utc::now();
        {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            state.dwell.stop(&mut state.interactions, now);
            if let Some(session) = state.session.as_mut() {
                session.end(&mut state.interactions, state.dwell.time_spent(), now);
            }
        }

        self.flush().await?;
        info!("Tracker shut down");
        Ok(())
    }

    async fn spawn_flusher(&self) {
        let mut guard = self.flusher.lock().await;
        if let Some(handle) = guard.take() {
            handle.abort();
        }

        let tracker = self.clone();
        let period = self.config.flush_interval;
        let handle = tokio::spawn(async move {
            let mut interval = time::interval(period);
            // The first tick fires immediately; skip it so flushes land on
            // the period boundaries.
            interval.tick().await;
            loop {
                interval.tick().await;
                if let Err(err) = tracker.flush().await {
                    error!("Periodic snapshot flush failed: {err:#}");
                }
            }
        });

        *guard = Some(handle);
    }

    async fn cancel_flusher(&self) {
        if let Some(handle) = self.flusher.lock().await.take() {
            handle.abort();
        }
    }
}

impl Clone for ProgressTracker {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            store: Arc::clone(&self.store),
            config: self.config.clone(),
            flusher: Arc::clone(&self.flusher),
        }
    }
}
