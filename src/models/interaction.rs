use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    SessionStart,
    SessionEnd,
    ModuleStart,
    ModuleEnd,
    AssignmentSubmit,
    ModuleComplete,
    GithubInteraction,
}

impl InteractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::SessionStart => "session_start",
            InteractionKind::SessionEnd => "session_end",
            InteractionKind::ModuleStart => "module_start",
            InteractionKind::ModuleEnd => "module_end",
            InteractionKind::AssignmentSubmit => "assignment_submit",
            InteractionKind::ModuleComplete => "module_complete",
            InteractionKind::GithubInteraction => "github_interaction",
        }
    }
}

/// One timestamped entry in the interaction log. Immutable once appended;
/// the free-form `data` map carries whatever context the event had.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractionRecord {
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    pub data: Map<String, Value>,
    pub timestamp: DateTime<Utc>,
}

impl InteractionRecord {
    /// The module this interaction touched, when the payload carries one.
    pub fn module_id(&self) -> Option<u32> {
        self.data
            .get("moduleId")
            .and_then(Value::as_u64)
            .and_then(|id| u32::try_from(id).ok())
    }
}

/// Coerce a `json!({...})` literal into the map shape interaction
/// payloads use. Non-object values become an empty payload.
pub(crate) fn payload(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
