use std::collections::HashMap;

use chrono::{DateTime, Utc};
use log::debug;
use serde_json::json;

use crate::interactions::InteractionLog;
use crate::models::{payload, InteractionKind};

/// The one dwell session that may be open at a time. Transient state,
/// deliberately never persisted.
#[derive(Debug, Clone, Copy)]
struct DwellSession {
    module_id: u32,
    started_at: DateTime<Utc>,
}

/// Tracks which module is currently open and accumulates total wall-clock
/// time per module id. Two states: Idle (`current` is `None`) and
/// Tracking (`current` holds the open session).
pub struct ModuleDwellTracker {
    current: Option<DwellSession>,
    time_spent: HashMap<u32, u64>,
}

impl ModuleDwellTracker {
    pub fn new() -> Self {
        Self::from_totals(HashMap::new())
    }

    pub fn from_totals(time_spent: HashMap<u32, u64>) -> Self {
        Self {
            current: None,
            time_spent,
        }
    }

    /// Open a dwell session for `module_id`. Any session already open is
    /// closed first under its own id, so switching straight from module A
    /// to module B books the elapsed time against A.
    pub fn start(&mut self, log: &mut InteractionLog, module_id: u32, now: DateTime<Utc>) {
        if self.current.is_some() {
            self.stop(log, now);
        }

        self.current = Some(DwellSession {
            module_id,
            started_at: now,
        });
        log.append(
            InteractionKind::ModuleStart,
            payload(json!({
                "moduleId": module_id,
                "timestamp": now.to_rfc3339(),
            })),
            now,
        );
        debug!("Dwell started for module {module_id}");
    }

    /// Close the open dwell session, if any. Adds the elapsed time to the
    /// module's accumulator and logs a `module_end` carrying both the
    /// increment and the updated total. No-op when idle.
    pub fn stop(&mut self, log: &mut InteractionLog, now: DateTime<Utc>) -> Option<(u32, u64)> {
        let session = self.current.take()?;

        let elapsed = (now - session.started_at).num_milliseconds().max(0) as u64;
        let total = self.time_spent.entry(session.module_id).or_insert(0);
        *total += elapsed;
        let total = *total;

        log.append(
            InteractionKind::ModuleEnd,
            payload(json!({
                "moduleId": session.module_id,
                "timestamp": now.to_rfc3339(),
                "timeSpent": elapsed,
                "totalTime": total,
            })),
            now,
        );
        debug!(
            "Dwell ended for module {} after {elapsed}ms (total {total}ms)",
            session.module_id
        );

        Some((session.module_id, elapsed))
    }

    pub fn current_module(&self) -> Option<u32> {
        self.current.map(|session| session.module_id)
    }

    pub fn time_spent(&self) -> &HashMap<u32, u64> {
        &self.time_spent
    }

    pub fn total_for(&self, module_id: u32) -> u64 {
        self.time_spent.get(&module_id).copied().unwrap_or(0)
    }
}

impl Default for ModuleDwellTracker {
    fn default() -> Self {
        Self::new()
    }
}
