use std::collections::HashMap;

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde_json::json;
use uuid::Uuid;

use crate::interactions::InteractionLog;
use crate::models::{payload, InteractionKind};

/// Environment descriptors the hosting application supplies at session
/// start; the tracker never computes these itself.
#[derive(Debug, Clone)]
pub struct SessionEnv {
    pub user_agent: String,
    pub screen_resolution: String,
}

/// Marks process-wide session start and end, bracketing the interaction
/// log with `session_start`/`session_end` records.
pub struct SessionLifecycle {
    id: String,
    started_at: DateTime<Utc>,
    ended: bool,
}

impl SessionLifecycle {
    pub fn start(log: &mut InteractionLog, env: &SessionEnv, now: DateTime<Utc>) -> Self {
        let id = Uuid::new_v4().to_string();
        log.append(
            InteractionKind::SessionStart,
            payload(json!({
                "sessionId": id,
                "timestamp": now.to_rfc3339(),
                "userAgent": env.user_agent,
                "screenResolution": env.screen_resolution,
            })),
            now,
        );
        info!("Session {id} started");

        Self {
            id,
            started_at: now,
            ended: false,
        }
    }

    /// Append the closing `session_end` record with the session duration
    /// and the full per-module time map. Best-effort by contract: the host
    /// may fail to call this at all, and a second call is a warned no-op.
    pub fn end(
        &mut self,
        log: &mut InteractionLog,
        module_time_spent: &HashMap<u32, u64>,
        now: DateTime<Utc>,
    ) -> Option<u64> {
        if self.ended {
            warn!("Session {} already ended; ignoring repeat end", self.id);
            return None;
        }
        self.ended = true;

        let duration = (now - self.started_at).num_milliseconds().max(0) as u64;
        log.append(
            InteractionKind::SessionEnd,
            payload(json!({
                "sessionId": self.id,
                "timestamp": now.to_rfc3339(),
                "duration": duration,
                "moduleTimeSpent": module_time_spent,
            })),
            now,
        );
        info!("Session {} ended after {duration}ms", self.id);

        Some(duration)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stamp(offset_secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap() + chrono::Duration::seconds(offset_secs)
    }

    fn env() -> SessionEnv {
        SessionEnv {
            user_agent: "test-agent".to_string(),
            screen_resolution: "1920x1080".to_string(),
        }
    }

    #[test]
    fn start_and_end_bracket_the_log() {
        let mut log = InteractionLog::new(100);
        let mut session = SessionLifecycle::start(&mut log, &env(), stamp(0));

        let totals = HashMap::from([(1, 5_000u64)]);
        let duration = session.end(&mut log, &totals, stamp(90));

        assert_eq!(duration, Some(90_000));
        assert_eq!(log.records()[0].kind, InteractionKind::SessionStart);
        assert_eq!(
            log.records()[0].data.get("userAgent").and_then(|v| v.as_str()),
            Some("test-agent")
        );

        let end = &log.records()[1];
        assert_eq!(end.kind, InteractionKind::SessionEnd);
        assert_eq!(end.data.get("duration").and_then(|v| v.as_u64()), Some(90_000));
        assert_eq!(
            end.data
                .get("moduleTimeSpent")
                .and_then(|v| v.get("1"))
                .and_then(|v| v.as_u64()),
            Some(5_000)
        );
    }

    #[test]
    fn second_end_is_ignored() {
        let mut log = InteractionLog::new(100);
        let mut session = SessionLifecycle::start(&mut log, &env(), stamp(0));

        assert!(session.end(&mut log, &HashMap::new(), stamp(10)).is_some());
        assert!(session.end(&mut log, &HashMap::new(), stamp(20)).is_none());
        assert_eq!(log.len(), 2);
        assert!(session.is_ended());
    }
}
