//! Minimal demo host: drives the tracker through a short simulated study
//! session against a SQLite-backed store and prints the derived metrics.

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use serde_json::json;
use studytrace::{
    analytics::CompletionState, format_duration_ms, store::SqliteStore, ProgressTracker,
    SessionEnv, TrackerConfig,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("studytrace demo starting up...");

    let data_dir = std::env::temp_dir().join("studytrace-demo");
    let store = Arc::new(SqliteStore::new(data_dir.join("studytrace.sqlite3"))?);
    let tracker = ProgressTracker::new(store, TrackerConfig::default());

    tracker
        .start_session(SessionEnv {
            user_agent: "studytrace-demo/0.1".to_string(),
            screen_resolution: "1920x1080".to_string(),
        })
        .await;

    tracker.module_opened(1).await;
    tracker.video_progress("intro", 30.0, 120.0).await;
    tokio::time::sleep(Duration::from_millis(150)).await;
    tracker.video_progress("intro", 35.0, 120.0).await;
    tracker
        .assignment_submitted(1, "quiz", json!({ "score": 9, "outOf": 10 }))
        .await;
    tracker.module_completed(1).await;
    tracker.module_opened(2).await;
    tracker
        .github_action("view", "https://github.com/example/course-labs")
        .await;

    let completion = CompletionState {
        completed: vec![1],
        total_modules: 12,
    };

    let summary = tracker.summary(&completion).await;
    println!(
        "progress: {}% ({}/{} modules), {} on modules, {} video(s), {} submission(s)",
        summary.overall_progress,
        summary.completed_modules,
        summary.total_modules,
        format_duration_ms(summary.time_spent_total),
        summary.videos_watched,
        summary.assignments_submitted,
    );

    let patterns = tracker.learning_patterns().await;
    println!(
        "most active: {}:00 on day {} ({} interactions)",
        patterns.most_active_hour, patterns.most_active_day, patterns.total_interactions,
    );

    let streak = tracker.study_streak().await;
    println!(
        "streak: {} day(s), best {} day(s), {} active in total",
        streak.current_streak, streak.max_streak, streak.total_days_active,
    );

    tracker.shutdown().await?;
    Ok(())
}
