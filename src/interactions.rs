use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::models::{InteractionKind, InteractionRecord};

/// Append-only, capacity-bounded ledger of timestamped events. The log
/// itself does no filtering; consumers scan [`records`](Self::records)
/// with whatever predicate they need.
pub struct InteractionLog {
    records: Vec<InteractionRecord>,
    capacity: usize,
}

impl InteractionLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: Vec::new(),
            capacity,
        }
    }

    /// Rebuild a log from persisted records, trimming from the front if a
    /// previously larger cap left more entries than `capacity` allows.
    pub fn from_records(records: Vec<InteractionRecord>, capacity: usize) -> Self {
        let mut log = Self { records, capacity };
        log.evict_oldest();
        log
    }

    pub fn append(&mut self, kind: InteractionKind, data: Map<String, Value>, now: DateTime<Utc>) {
        self.records.push(InteractionRecord {
            kind,
            data,
            timestamp: now,
        });
        self.evict_oldest();
    }

    pub fn records(&self) -> &[InteractionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn evict_oldest(&mut self) {
        if self.records.len() > self.capacity {
            let excess = self.records.len() - self.capacity;
            self.records.drain(..excess);
        }
    }
}
